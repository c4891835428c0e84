// Financial overview rendering module
//
// Renders the panel opened from the center node: the three totals and the
// combined profit/expense history, newest first.

use crate::api::EntryKind;
use crate::app::panels::{HistoryItem, Load};
use crate::app::{AppState, SummaryState};
use crate::money::format_money;
use crate::theme::{
    amount_color, entry_kind_color, BLOOD_RED, BONE_WHITE, DEEP_INDIGO, NEON_PURPLE,
    PUMPKIN_ORANGE, TOXIC_GREEN,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Signed amount as shown in the history: profits positive, expenses negative
pub fn signed_amount(item: &HistoryItem) -> f64 {
    match item.kind {
        EntryKind::Profit => item.entry.amount,
        EntryKind::Expense => -item.entry.amount,
    }
}

fn history_line(item: &HistoryItem) -> Line<'static> {
    let amount = signed_amount(item);
    let text = if amount >= 0.0 {
        format!("+{}", format_money(amount))
    } else {
        format_money(amount)
    };
    Line::from(vec![
        Span::styled(
            format!(" {} ", item.entry.date.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:>14} ", text),
            Style::default().fg(entry_kind_color(item.kind)),
        ),
        Span::styled(item.entry.description.clone(), Style::default().fg(BONE_WHITE)),
        Span::styled(
            format!(" [{}]", item.entry.category.name),
            Style::default().fg(Color::Cyan),
        ),
    ])
}

pub fn render_overview_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let totals = match &app.summary {
        SummaryState::Ready(summary) => vec![
            Line::from(vec![
                Span::styled(" Net Worth:      ", Style::default().fg(BONE_WHITE)),
                Span::styled(
                    format_money(summary.net_worth),
                    Style::default()
                        .fg(amount_color(summary.net_worth))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Total Profits:  ", Style::default().fg(BONE_WHITE)),
                Span::styled(
                    format_money(summary.total_profits),
                    Style::default().fg(TOXIC_GREEN),
                ),
            ]),
            Line::from(vec![
                Span::styled(" Total Expenses: ", Style::default().fg(BONE_WHITE)),
                Span::styled(
                    format_money(summary.total_expenses),
                    Style::default().fg(BLOOD_RED),
                ),
            ]),
        ],
        _ => vec![Line::from(Span::styled(
            " Totals unavailable",
            Style::default().fg(BONE_WHITE),
        ))],
    };
    let header = Paragraph::new(totals).block(
        Block::default()
            .title(vec![Span::styled(
                "━ Financial Overview ━",
                Style::default()
                    .fg(NEON_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )])
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(NEON_PURPLE)),
    );
    f.render_widget(header, chunks[0]);

    let Some(panel) = app.overview_panel.as_mut() else {
        return;
    };

    let (items, title): (Vec<ListItem>, String) = match &panel.load {
        Load::Loading => (
            vec![ListItem::new(Span::styled(
                " Loading history...",
                Style::default().fg(BONE_WHITE),
            ))],
            "━ History ━".to_string(),
        ),
        Load::Failed(message) => (
            vec![ListItem::new(Span::styled(
                format!(" {}", message),
                Style::default().fg(BLOOD_RED),
            ))],
            "━ History ━".to_string(),
        ),
        Load::Missing => (Vec::new(), "━ History ━".to_string()),
        Load::Ready(history) => (
            history.iter().map(|item| ListItem::new(history_line(item))).collect(),
            format!("━ History ({}) ━", history.len()),
        ),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(vec![Span::styled(
                    title,
                    Style::default()
                        .fg(PUMPKIN_ORANGE)
                        .add_modifier(Modifier::BOLD),
                )])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(PUMPKIN_ORANGE)),
        )
        .highlight_style(Style::default().bg(DEEP_INDIGO));
    f.render_stateful_widget(list, chunks[1], &mut panel.list_state);
}
