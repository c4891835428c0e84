// Status Bar rendering module
//
// Renders the bottom status bar with context-sensitive keyboard shortcuts
// and toggle indicators.

use crate::app::router::DashboardView;
use crate::app::{AppState, Screen};
use crate::theme::{BONE_WHITE, NEON_PURPLE, TOXIC_GREEN};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Keyboard hint; lower priority numbers are kept first when space runs out
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub priority: u8,
    pub key: &'static str,
    pub desc: &'static str,
    pub color: Color,
}

const fn hint(priority: u8, key: &'static str, desc: &'static str) -> Hint {
    Hint {
        priority,
        key,
        desc,
        color: NEON_PURPLE,
    }
}

/// Hints for whatever currently receives key presses
pub fn context_hints(app: &AppState) -> Vec<Hint> {
    if app.screen == Screen::Login {
        return vec![
            hint(1, "Enter:", "Submit | "),
            hint(1, "F2:", "Login/Register | "),
            Hint {
                color: Color::Red,
                ..hint(1, "Esc:", "Quit ")
            },
        ];
    }
    if app.modal.is_some() {
        return vec![
            hint(1, "Enter:", "Save | "),
            hint(1, "Esc:", "Cancel | "),
            hint(2, "Tab:", "Next field "),
        ];
    }
    if app
        .category_panel
        .as_ref()
        .is_some_and(|p| p.confirm.is_some())
    {
        return vec![hint(1, "y:", "Confirm | "), hint(1, "n:", "Keep ")];
    }

    let mut hints = match app.router.view() {
        DashboardView::Graph => vec![
            Hint {
                color: Color::Red,
                ..hint(1, "Q:", "Quit | ")
            },
            hint(1, "Click/Tab:", "Select | "),
            hint(2, "Dbl-click/F:", "Fit | "),
            hint(2, "A:", "Anim | "),
            hint(2, "t:", "Labels | "),
        ],
        DashboardView::CategoryDetails { .. } => vec![
            hint(1, "Esc:", "Back | "),
            hint(1, "↑↓:", "Select | "),
            hint(1, "Enter:", "Edit entry | "),
            hint(2, "d:", "Delete entry | "),
            hint(2, "n:", "Edit category | "),
            hint(2, "X:", "Delete category | "),
        ],
        DashboardView::FinancialOverview => vec![
            hint(1, "Esc:", "Back | "),
            hint(1, "↑↓:", "Scroll | "),
        ],
    };
    hints.extend([
        hint(2, "c:", "Category | "),
        hint(2, "p:", "Profit | "),
        hint(2, "e:", "Expense | "),
        hint(3, "r:", "Refresh | "),
        hint(3, "L:", "Logout "),
    ]);
    hints
}

/// Keep hints by priority until `available_width` columns are used
///
/// Kept hints stay in their original order.
pub fn fit_hints(hints: &[Hint], available_width: usize) -> Vec<&Hint> {
    let mut keep = vec![false; hints.len()];
    let mut used = 0;
    for priority in 1..=3 {
        for (idx, h) in hints.iter().enumerate() {
            if h.priority != priority {
                continue;
            }
            let len = h.key.width() + h.desc.width();
            if used + len <= available_width {
                keep[idx] = true;
                used += len;
            }
        }
    }
    hints
        .iter()
        .zip(keep)
        .filter_map(|(h, kept)| kept.then_some(h))
        .collect()
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let toggle_indicators = build_toggle_indicators(app);
    let toggle_width: usize = toggle_indicators.iter().map(|s| s.content.width()).sum();

    // Subtract borders, icon and indicators
    let available_width = (area.width as usize).saturating_sub(6 + toggle_width);

    let hints = context_hints(app);
    let mut spans = vec![Span::styled(" ◆ ", Style::default().fg(NEON_PURPLE))];
    for h in fit_hints(&hints, available_width) {
        spans.push(Span::styled(
            h.key,
            Style::default().fg(h.color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(h.desc));
    }

    if app.screen == Screen::Dashboard {
        spans.push(Span::raw(" "));
        spans.extend(toggle_indicators);
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn toggle_spans(key: &'static str, enabled: bool) -> [Span<'static>; 3] {
    let (state, color) = if enabled {
        ("ON", TOXIC_GREEN)
    } else {
        ("OFF", BONE_WHITE)
    };
    [
        Span::styled(key, Style::default().fg(BONE_WHITE)),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("] ", Style::default().fg(BONE_WHITE)),
    ]
}

/// Build toggle status indicator spans for the status bar
/// Shows [A:ON/OFF] [t:ON/OFF] with appropriate colors
/// Toxic Green for ON, Bone White for OFF
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    spans.extend(toggle_spans("[A:", app.settings.animations_enabled));
    spans.extend(toggle_spans("[t:", app.settings.labels_enabled));
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_hints_keeps_everything_when_wide() {
        let hints = vec![hint(2, "a:", "one | "), hint(1, "b:", "two ")];
        let kept = fit_hints(&hints, 100);
        assert_eq!(kept.len(), 2);
        // Original order survives
        assert_eq!(kept[0].key, "a:");
    }

    #[test]
    fn test_fit_hints_drops_low_priority_first() {
        let hints = vec![
            hint(3, "r:", "Refresh | "),
            hint(1, "Q:", "Quit | "),
            hint(2, "A:", "Anim | "),
        ];
        // Room for "Q:Quit | " (9) and "A:Anim | " (9) only
        let kept = fit_hints(&hints, 18);
        let keys: Vec<&str> = kept.iter().map(|h| h.key).collect();
        assert_eq!(keys, vec!["Q:", "A:"]);
    }

    #[test]
    fn test_fit_hints_zero_width() {
        let hints = vec![hint(1, "Q:", "Quit ")];
        assert!(fit_hints(&hints, 0).is_empty());
    }

    #[test]
    fn test_toggle_spans_colors() {
        let on = toggle_spans("[A:", true);
        assert_eq!(on[1].content, "ON");
        assert_eq!(on[1].style.fg, Some(TOXIC_GREEN));
        let off = toggle_spans("[t:", false);
        assert_eq!(off[1].content, "OFF");
        assert_eq!(off[1].style.fg, Some(BONE_WHITE));
    }
}
