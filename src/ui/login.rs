// Login screen rendering module
//
// Renders the username/password form with a Login/Register mode switch.

use super::centered_rect;
use super::modal::{cursor_position, feedback_line, field_line};
use crate::app::forms::{AuthMode, LoginField, LoginForm};
use crate::app::AppState;
use crate::theme::{BONE_WHITE, NEON_PURPLE, PUMPKIN_ORANGE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Password as shown on screen
pub fn masked(password: &str) -> String {
    "•".repeat(password.chars().count())
}

fn mode_tab(mode: AuthMode, active: AuthMode) -> Span<'static> {
    if mode == active {
        Span::styled(
            format!("[ {} ]", mode.title()),
            Style::default()
                .fg(PUMPKIN_ORANGE)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("  {}  ", mode.title()), Style::default().fg(BONE_WHITE))
    }
}

fn login_lines(form: &LoginForm) -> Vec<Line<'static>> {
    let pending = form.submitting.then_some(match form.mode {
        AuthMode::Login => "Signing in...",
        AuthMode::Register => "Creating account...",
    });
    vec![
        Line::from(vec![
            mode_tab(AuthMode::Login, form.mode),
            Span::raw(" "),
            mode_tab(AuthMode::Register, form.mode),
        ]),
        Line::from(""),
        field_line(
            "Username",
            form.username.value().to_string(),
            form.focus == LoginField::Username,
        ),
        field_line(
            "Password",
            masked(form.password.value()),
            form.focus == LoginField::Password,
        ),
        Line::from(""),
        feedback_line(form.error.as_deref(), pending),
        Line::from(Span::styled(
            "Tab next field · Enter submit · F2 login/register · Esc quit",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

pub fn render_login(f: &mut Frame, area: Rect, app: &AppState) {
    let form = &app.login;
    let lines = login_lines(form);
    let rect = centered_rect(area, 66, lines.len() as u16 + 2);

    let block = Block::default()
        .title(vec![Span::styled(
            format!("━ {} ━", form.mode.title()),
            Style::default()
                .fg(NEON_PURPLE)
                .add_modifier(Modifier::BOLD),
        )])
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(NEON_PURPLE));
    let inner = block.inner(rect);
    f.render_widget(Paragraph::new(lines).block(block), rect);

    if !form.submitting {
        let position = match form.focus {
            LoginField::Username => cursor_position(inner, 2, &form.username),
            LoginField::Password => cursor_position(inner, 3, &form.password),
        };
        f.set_cursor_position(position);
    }
}
