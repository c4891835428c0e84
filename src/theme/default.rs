// Theme functions
//
// Color helpers shared by the UI modules.

use ratatui::style::Color;

use super::{BLOOD_RED, BONE_WHITE, TOXIC_GREEN};
use crate::api::EntryKind;
use crate::graph::color::Rgb;
use crate::graph::BorderTone;

/// Terminal color for a graph RGB triple
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// # Arguments
/// * `color1` - Starting color as (r, g, b) tuple
/// * `color2` - Ending color as (r, g, b) tuple
/// * `ratio` - Interpolation ratio (0.0 = color1, 1.0 = color2)
///
/// # Returns
/// Interpolated Color::Rgb value
pub fn interpolate_color(color1: Rgb, color2: Rgb, ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio).round() as u8;
    Color::Rgb(
        channel(color1.0, color2.0),
        channel(color1.1, color2.1),
        channel(color1.2, color2.2),
    )
}

/// Outline color of the center node
pub fn border_tone_color(tone: BorderTone) -> Color {
    match tone {
        BorderTone::Positive => TOXIC_GREEN,
        BorderTone::Negative => BLOOD_RED,
    }
}

/// Color for a signed amount: green above zero, red below, neutral at zero
pub fn amount_color(amount: f64) -> Color {
    if amount > 0.0 {
        TOXIC_GREEN
    } else if amount < 0.0 {
        BLOOD_RED
    } else {
        BONE_WHITE
    }
}

pub fn entry_kind_color(kind: EntryKind) -> Color {
    match kind {
        EntryKind::Profit => TOXIC_GREEN,
        EntryKind::Expense => BLOOD_RED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_color_endpoints() {
        assert_eq!(
            interpolate_color((0, 0, 0), (200, 100, 50), 0.0),
            Color::Rgb(0, 0, 0)
        );
        assert_eq!(
            interpolate_color((0, 0, 0), (200, 100, 50), 1.0),
            Color::Rgb(200, 100, 50)
        );
    }

    #[test]
    fn test_interpolate_color_clamps_ratio() {
        assert_eq!(
            interpolate_color((10, 10, 10), (20, 20, 20), 3.0),
            Color::Rgb(20, 20, 20)
        );
        assert_eq!(
            interpolate_color((10, 10, 10), (20, 20, 20), -1.0),
            Color::Rgb(10, 10, 10)
        );
    }

    #[test]
    fn test_interpolate_color_rounds() {
        // 0 + 255 * 0.5 = 127.5 rounds up
        assert_eq!(
            interpolate_color((0, 0, 0), (255, 255, 255), 0.5),
            Color::Rgb(128, 128, 128)
        );
    }

    #[test]
    fn test_amount_color() {
        assert_eq!(amount_color(12.0), TOXIC_GREEN);
        assert_eq!(amount_color(-0.01), BLOOD_RED);
        assert_eq!(amount_color(0.0), BONE_WHITE);
    }

    #[test]
    fn test_border_tone_color() {
        assert_eq!(border_tone_color(BorderTone::Positive), TOXIC_GREEN);
        assert_eq!(border_tone_color(BorderTone::Negative), BLOOD_RED);
    }
}
