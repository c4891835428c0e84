// Modal rendering module
//
// Renders the category and entry forms as an overlay centered on the
// screen, with the terminal cursor placed in the focused text field.

use super::centered_rect;
use crate::app::forms::{CategoryField, CategoryForm, EntryField, EntryForm, Modal, TextInput};
use crate::app::panels::Load;
use crate::theme::{
    entry_kind_color, BLOOD_RED, BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE,
};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Column where field values start, after the padded label
pub(super) const LABEL_WIDTH: u16 = 14;

/// One `Label: value` row, highlighted when focused
pub(super) fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default()
            .fg(PUMPKIN_ORANGE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BONE_WHITE)
    };
    Line::from(vec![
        Span::styled(
            format!("{:<width$}", format!("{}:", label), width = LABEL_WIDTH as usize),
            label_style,
        ),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Terminal position of the cursor inside a text field on row `row` of `inner`
pub(super) fn cursor_position(inner: Rect, row: u16, input: &TextInput) -> Position {
    let column = inner.x + LABEL_WIDTH + input.cursor_column() as u16;
    Position::new(
        column.min(inner.right().saturating_sub(1)),
        inner.y + row,
    )
}

/// Error or progress line at the bottom of a form
pub(super) fn feedback_line(error: Option<&str>, pending: Option<&str>) -> Line<'static> {
    match (error, pending) {
        (_, Some(text)) => Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(PUMPKIN_ORANGE),
        )),
        (Some(text), None) => Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(BLOOD_RED),
        )),
        (None, None) => Line::from(""),
    }
}

fn hint_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn category_form_lines(form: &CategoryForm) -> Vec<Line<'static>> {
    let kind_color = entry_kind_color(form.kind.entry_kind());
    let mut type_line = field_line("Type", String::new(), form.focus == CategoryField::Type);
    type_line.spans.push(Span::styled(
        format!("◂ {} ▸", form.kind.label()),
        Style::default().fg(kind_color).add_modifier(Modifier::BOLD),
    ));
    vec![
        Line::from(""),
        field_line(
            "Name",
            form.name.value().to_string(),
            form.focus == CategoryField::Name,
        ),
        type_line,
        Line::from(""),
        feedback_line(form.error.as_deref(), form.submitting.then_some("Saving...")),
        hint_line("Tab next field · ←/→ type · Enter save · Esc cancel"),
    ]
}

/// Text shown in the category row of the entry form
pub fn category_choice_text(form: &EntryForm) -> String {
    match &form.categories {
        Load::Loading => "Loading categories...".to_string(),
        Load::Failed(message) => message.clone(),
        Load::Missing => "No categories".to_string(),
        Load::Ready(categories) if categories.is_empty() => form.no_categories_message().to_string(),
        Load::Ready(categories) => {
            let name = form
                .selected_category()
                .map_or("", |c| c.name.as_str());
            format!(
                "◂ {} ▸ ({}/{})",
                name,
                form.category_index + 1,
                categories.len()
            )
        }
    }
}

fn entry_form_lines(form: &EntryForm) -> Vec<Line<'static>> {
    let pending = if form.submitting {
        Some("Saving...")
    } else if form.categories.is_loading() {
        Some("Loading categories...")
    } else {
        None
    };
    vec![
        Line::from(""),
        field_line(
            "Description",
            form.description.value().to_string(),
            form.focus == EntryField::Description,
        ),
        field_line(
            "Amount",
            format!("$ {}", form.amount_display()),
            form.focus == EntryField::Amount,
        ),
        field_line(
            "Date",
            form.date.value().to_string(),
            form.focus == EntryField::Date,
        ),
        field_line(
            "Category",
            category_choice_text(form),
            form.focus == EntryField::Category,
        ),
        Line::from(""),
        feedback_line(form.error.as_deref(), pending),
        hint_line("Tab next field · digits amount · ←/→ category · Enter save · Esc cancel"),
    ]
}

pub fn render_modal(f: &mut Frame, screen: Rect, modal: &Modal) {
    let (title, color, lines) = match modal {
        Modal::Category(form) => (form.title().to_string(), NEON_PURPLE, category_form_lines(form)),
        Modal::Entry(form) => (form.title(), entry_kind_color(form.kind), entry_form_lines(form)),
    };

    let area = centered_rect(screen, 72, lines.len() as u16 + 2);
    let block = Block::default()
        .title(vec![Span::styled(
            format!("━ {} ━", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )])
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);

    // Rows match the line order built above
    let cursor = match modal {
        Modal::Category(form) if !form.submitting && form.focus == CategoryField::Name => {
            Some(cursor_position(inner, 1, &form.name))
        }
        Modal::Entry(form) if !form.is_disabled() => match form.focus {
            EntryField::Description => Some(cursor_position(inner, 1, &form.description)),
            EntryField::Date => Some(cursor_position(inner, 3, &form.date)),
            _ => None,
        },
        _ => None,
    };
    if let Some(position) = cursor {
        f.set_cursor_position(position);
    }
}
