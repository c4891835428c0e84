// Banner rendering module
//
// Renders the top banner with the title, the summary totals, a spinner
// while requests are pending, and the transient status message.

use super::spinner_frame;
use crate::app::{AppState, Screen, SummaryState};
use crate::money::format_money;
use crate::theme::{amount_color, BLOOD_RED, BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE, TOXIC_GREEN};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let mut title = vec![
        Span::styled(
            " ◆ NETWORTH ",
            Style::default()
                .fg(Color::Rgb(138, 43, 226))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "personal finance dashboard",
            Style::default().fg(Color::Gray),
        ),
    ];
    if app.is_busy() {
        title.push(Span::styled(
            format!("  {} working", spinner_frame(app.pulse_phase)),
            Style::default().fg(PUMPKIN_ORANGE),
        ));
    }

    let stats = match (&app.screen, &app.summary) {
        (Screen::Login, _) => vec![Span::styled(
            " Not signed in",
            Style::default().fg(BONE_WHITE),
        )],
        (Screen::Dashboard, SummaryState::Loading) => vec![Span::styled(
            " Loading summary...",
            Style::default().fg(BONE_WHITE),
        )],
        (Screen::Dashboard, SummaryState::Failed(_)) => vec![Span::styled(
            " Summary unavailable",
            Style::default().fg(BLOOD_RED),
        )],
        (Screen::Dashboard, SummaryState::Ready(summary)) => vec![
            Span::styled(" Net Worth: ", Style::default().fg(BONE_WHITE)),
            Span::styled(
                format_money(summary.net_worth),
                Style::default()
                    .fg(amount_color(summary.net_worth))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  │ Profits: ", Style::default().fg(BONE_WHITE)),
            Span::styled(
                format_money(summary.total_profits),
                Style::default().fg(TOXIC_GREEN),
            ),
            Span::styled("  │ Expenses: ", Style::default().fg(BONE_WHITE)),
            Span::styled(
                format_money(summary.total_expenses),
                Style::default().fg(BLOOD_RED),
            ),
            Span::styled(
                format!("  │ Categories: {}", summary.all_categories.len()),
                Style::default().fg(BONE_WHITE),
            ),
        ],
    };

    let mut lines = vec![Line::from(title), Line::from(stats)];
    if let Some(status) = &app.status {
        let color = if status.is_error { BLOOD_RED } else { TOXIC_GREEN };
        // Status shares the stats line when it fits
        lines[1].spans.push(Span::styled(
            format!("   » {}", status.text),
            Style::default().fg(color),
        ));
    }

    let banner = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(NEON_PURPLE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}
