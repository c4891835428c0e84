// Category details rendering module
//
// Renders the panel opened by clicking a category node: the category
// header with its total, the list of its entries, and the y/n prompt for a
// pending deletion.

use crate::app::panels::{CategoryPanel, Load, PendingConfirm};
use crate::app::AppState;
use crate::money::format_money;
use crate::theme::{entry_kind_color, BLOOD_RED, BONE_WHITE, DEEP_INDIGO, NEON_PURPLE, PUMPKIN_ORANGE};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

/// View model for the header of the category panel
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryHeaderView {
    pub title: String,
    pub lines: Vec<String>,
    pub is_error: bool,
}

/// Build the header text for the current load state
pub fn build_category_header(panel: &CategoryPanel) -> CategoryHeaderView {
    match &panel.load {
        Load::Loading => CategoryHeaderView {
            title: format!("Category #{}", panel.category_id),
            lines: vec!["Loading category...".to_string()],
            is_error: false,
        },
        Load::Missing => CategoryHeaderView {
            title: format!("Category #{}", panel.category_id),
            lines: vec!["Category not found.".to_string()],
            is_error: true,
        },
        Load::Failed(message) => CategoryHeaderView {
            title: format!("Category #{}", panel.category_id),
            lines: vec![message.clone()],
            is_error: true,
        },
        Load::Ready(data) => CategoryHeaderView {
            title: data.category.name.clone(),
            lines: vec![
                format!(
                    "Type: {}  │  Total: {}",
                    data.category.kind.label(),
                    format_money(data.total())
                ),
                format!("{} {} entries", data.entries.len(), data.entry_kind().label()),
            ],
            is_error: false,
        },
    }
}

/// Question shown for a pending deletion
pub fn confirm_prompt(confirm: PendingConfirm) -> String {
    match confirm {
        PendingConfirm::DeleteEntry { kind, .. } => {
            format!("Delete this {} entry? (y/n)", kind.label().to_lowercase())
        }
        PendingConfirm::DeleteCategory { .. } => {
            "Delete this category and all of its entries? (y/n)".to_string()
        }
    }
}

pub fn render_category_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    let Some(panel) = app.category_panel.as_mut() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(0),    // Entries
            Constraint::Length(if panel.confirm.is_some() { 3 } else { 0 }),
        ])
        .split(area);

    let header = build_category_header(panel);
    let text_color = if header.is_error { BLOOD_RED } else { BONE_WHITE };
    let header_widget = Paragraph::new(
        header
            .lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(text_color))))
            .collect::<Vec<_>>(),
    )
    .block(
        Block::default()
            .title(vec![Span::styled(
                format!("━ {} ━", header.title),
                Style::default()
                    .fg(NEON_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )])
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(NEON_PURPLE)),
    );
    f.render_widget(header_widget, chunks[0]);

    let items: Vec<ListItem> = match panel.load.ready() {
        Some(data) => {
            let color = entry_kind_color(data.entry_kind());
            data.entries
                .iter()
                .map(|entry| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!(" {} ", entry.date.format("%Y-%m-%d")),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            format!("{:>14} ", format_money(entry.amount)),
                            Style::default().fg(color),
                        ),
                        Span::styled(entry.description.clone(), Style::default().fg(BONE_WHITE)),
                    ]))
                })
                .collect()
        }
        None => Vec::new(),
    };
    let empty = items.is_empty() && panel.load.ready().is_some();

    let list = List::new(items)
        .block(
            Block::default()
                .title(vec![Span::styled(
                    if empty {
                        "━ Entries (none yet) ━"
                    } else {
                        "━ Entries ━"
                    },
                    Style::default()
                        .fg(PUMPKIN_ORANGE)
                        .add_modifier(Modifier::BOLD),
                )])
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(PUMPKIN_ORANGE)),
        )
        .highlight_style(Style::default().bg(DEEP_INDIGO))
        .highlight_symbol("▸");
    f.render_stateful_widget(list, chunks[1], &mut panel.list_state);

    if let Some(confirm) = panel.confirm {
        let prompt = Paragraph::new(Line::from(Span::styled(
            confirm_prompt(confirm),
            Style::default().fg(BLOOD_RED).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(BLOOD_RED)),
        );
        f.render_widget(prompt, chunks[2]);
    }
}
