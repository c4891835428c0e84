// UI rendering module
//
// This module contains all UI rendering components for the dashboard.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod category_panel;
mod graph_view;
mod login;
mod modal;
mod overview_panel;
mod status_bar;

use crate::app::router::DashboardView;
use crate::app::{AppState, Screen};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use banner::render_banner;
use category_panel::render_category_panel;
use graph_view::render_graph;
use login::render_login;
use modal::render_modal;
use overview_panel::render_overview_panel;
use status_bar::render_status_bar;

/// Frames of the loading spinner shown in the banner
pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    // Main layout: banner, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Banner
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], app);

    match app.screen {
        Screen::Login => render_login(f, chunks[1], app),
        Screen::Dashboard => match app.router.view() {
            DashboardView::Graph => render_graph(f, chunks[1], app),
            DashboardView::CategoryDetails { .. } => render_category_panel(f, chunks[1], app),
            DashboardView::FinancialOverview => render_overview_panel(f, chunks[1], app),
        },
    }

    render_status_bar(f, chunks[2], app);

    if let Some(modal) = app.modal.as_ref() {
        render_modal(f, size, modal);
    }
}

/// Rectangle of the given size centered in `area`, clipped to it
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Shorten text to at most `max_width` terminal columns, ending in `…` when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Current spinner frame for a pulse phase in 0.0..1.0
pub fn spinner_frame(pulse_phase: f32) -> &'static str {
    let idx = (pulse_phase.clamp(0.0, 0.999) * SPINNER_FRAMES.len() as f32) as usize;
    SPINNER_FRAMES[idx % SPINNER_FRAMES.len()]
}
