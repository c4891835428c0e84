// Theme module - Color constants and theme re-exports
//
// This module provides the terminal palette for the dashboard. Graph node
// colors come from `crate::graph::color`; everything around the graph
// (borders, titles, amounts, hints) uses the constants below.

pub mod default;

use ratatui::style::Color;

/// Primary accent color - used for borders, titles, edges
/// RGB: (187, 154, 247)
pub const NEON_PURPLE: Color = Color::Rgb(187, 154, 247);

/// Warning/highlight color - used for focus rings, pending work
/// RGB: (255, 158, 100)
pub const PUMPKIN_ORANGE: Color = Color::Rgb(255, 158, 100);

/// Danger indicator - used for errors, expenses, negative balances
/// RGB: (247, 118, 142)
pub const BLOOD_RED: Color = Color::Rgb(247, 118, 142);

/// Healthy indicator - used for profits, positive balances
/// RGB: (158, 206, 106)
pub const TOXIC_GREEN: Color = Color::Rgb(158, 206, 106);

/// Neutral text - used for general text, inactive fields
/// RGB: (169, 177, 214)
pub const BONE_WHITE: Color = Color::Rgb(169, 177, 214);

/// Selected row background
/// RGB: (47, 51, 77)
pub const DEEP_INDIGO: Color = Color::Rgb(47, 51, 77);

// Re-export theme functions for convenient access
pub use default::*;
