// Keyboard and mouse event handling
//
// This module routes input to the login screen, the open modal, a pending
// confirmation, or the active dashboard view, in that order of priority.

use super::forms::{CategoryField, EntryField, TextInput};
use super::router::DashboardView;
use super::{AppState, Screen};
use crate::api::EntryKind;
use crate::app::config::DOUBLE_CLICK_WINDOW;
use crate::app::forms::Modal;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

/// Detects two presses on the same cell within `DOUBLE_CLICK_WINDOW`
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(u16, u16, Instant)>,
}

impl ClickTracker {
    /// Record a press; returns `true` when it completes a double-click
    pub fn register(&mut self, column: u16, row: u16, now: Instant) -> bool {
        let double = matches!(
            self.last,
            Some((c, r, at)) if c == column && r == row && now.duration_since(at) <= DOUBLE_CLICK_WINDOW
        );
        // A completed double-click does not start another one
        self.last = if double { None } else { Some((column, row, now)) };
        double
    }
}

/// Apply a text-editing key to an input; returns whether it was consumed
fn edit_text(input: &mut TextInput, key: KeyCode) -> bool {
    match key {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Arguments
/// * `app` - Mutable reference to the application state
/// * `key` - The key code that was pressed
///
/// # Key Bindings (dashboard)
/// - `q` - Quit (graph view)
/// - `Tab` / `Shift-Tab` - Cycle node focus; `Enter` opens the focused node
/// - `f` - Fit graph to view
/// - `t` / `a` - Toggle labels / edge animation
/// - `c` / `p` / `e` - New category / profit / expense
/// - `r` - Refresh, `L` - Logout, `Esc` - Close panel or modal
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    match app.screen {
        Screen::Login => handle_login_key(app, key),
        Screen::Dashboard => {
            if app.modal.is_some() {
                handle_modal_key(app, key);
            } else if app
                .category_panel
                .as_ref()
                .is_some_and(|p| p.confirm.is_some())
            {
                handle_confirm_key(app, key);
            } else {
                handle_dashboard_key(app, key);
            }
        }
    }
    app.running
}

fn handle_login_key(app: &mut AppState, key: KeyCode) {
    if app.login.submitting {
        if key == KeyCode::Esc {
            app.running = false;
        }
        return;
    }
    match key {
        KeyCode::Esc => app.running = false,
        KeyCode::F(2) => app.login.toggle_mode(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.login.next_field(),
        KeyCode::Enter => {
            if app.login.focus == super::forms::LoginField::Username {
                app.login.next_field();
            } else {
                app.submit_login();
            }
        }
        other => {
            edit_text(app.login.focused_input(), other);
        }
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyCode) {
    if key == KeyCode::Esc {
        app.cancel_modal();
        return;
    }
    if key == KeyCode::Enter {
        app.submit_modal();
        return;
    }
    let Some(modal) = app.modal.as_mut() else {
        return;
    };
    match modal {
        Modal::Category(form) => {
            if form.submitting {
                return;
            }
            match (key, form.focus) {
                (KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down, _) => {
                    form.next_field()
                }
                (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), CategoryField::Type) => {
                    form.toggle_kind()
                }
                (other, CategoryField::Name) => {
                    edit_text(&mut form.name, other);
                }
                _ => {}
            }
        }
        Modal::Entry(form) => {
            if form.is_disabled() {
                return;
            }
            match (key, form.focus) {
                (KeyCode::Tab | KeyCode::Down, _) => form.next_field(),
                (KeyCode::BackTab | KeyCode::Up, _) => form.previous_field(),
                (KeyCode::Char(c), EntryField::Amount) if c.is_ascii_digit() => {
                    form.push_amount_digit(c)
                }
                (KeyCode::Backspace, EntryField::Amount) => form.pop_amount_digit(),
                (KeyCode::Left, EntryField::Category) => form.cycle_category(false),
                (KeyCode::Right | KeyCode::Char(' '), EntryField::Category) => {
                    form.cycle_category(true)
                }
                (other, EntryField::Description) => {
                    edit_text(&mut form.description, other);
                }
                (other, EntryField::Date) => {
                    edit_text(&mut form.date, other);
                }
                _ => {}
            }
        }
    }
}

fn handle_confirm_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.resolve_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_confirm(false),
        _ => {}
    }
}

fn handle_dashboard_key(app: &mut AppState, key: KeyCode) {
    // Keys shared by every view
    match key {
        KeyCode::Char('c') => return app.open_category_form(),
        KeyCode::Char('p') => return app.open_entry_form(EntryKind::Profit),
        KeyCode::Char('e') => return app.open_entry_form(EntryKind::Expense),
        KeyCode::Char('r') => return app.refresh(),
        KeyCode::Char('L') => return app.logout(),
        _ => {}
    }

    match app.router.view() {
        DashboardView::Graph => match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => app.running = false,
            KeyCode::Tab => app.focus_next_node(),
            KeyCode::BackTab => app.focus_previous_node(),
            KeyCode::Enter => app.activate_focused_node(),
            KeyCode::Esc => app.focused_node = None,
            KeyCode::Char('f') | KeyCode::Char('F') => app.renderer.fit_to_view(),
            // Toggle edge animation
            KeyCode::Char('a') | KeyCode::Char('A') => {
                app.settings.animations_enabled = !app.settings.animations_enabled;
            }
            // Toggle node labels
            KeyCode::Char('t') | KeyCode::Char('T') => {
                app.settings.labels_enabled = !app.settings.labels_enabled;
            }
            _ => {}
        },
        DashboardView::CategoryDetails { .. } => match key {
            KeyCode::Esc => app.close_panel(),
            KeyCode::Up => {
                if let Some(panel) = app.category_panel.as_mut() {
                    panel.select_previous();
                }
            }
            KeyCode::Down => {
                if let Some(panel) = app.category_panel.as_mut() {
                    panel.select_next();
                }
            }
            KeyCode::Enter => app.open_edit_entry(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete_entry(),
            KeyCode::Char('n') => app.open_edit_category(),
            KeyCode::Char('X') => app.request_delete_category(),
            _ => {}
        },
        DashboardView::FinancialOverview => match key {
            KeyCode::Esc => app.close_panel(),
            KeyCode::Up => {
                if let Some(panel) = app.overview_panel.as_mut() {
                    panel.select_previous();
                }
            }
            KeyCode::Down => {
                if let Some(panel) = app.overview_panel.as_mut() {
                    panel.select_next();
                }
            }
            _ => {}
        },
    }
}

/// Handle mouse input on the graph canvas
///
/// A left press is a node click; a second press on the same cell shortly
/// after fits the graph to the view instead.
pub fn handle_mouse_event(
    app: &mut AppState,
    mouse: MouseEvent,
    clicks: &mut ClickTracker,
    now: Instant,
) {
    if app.screen != Screen::Dashboard || app.modal.is_some() || !app.router.is_graph() {
        return;
    }
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if clicks.register(mouse.column, mouse.row, now) {
            app.renderer.fit_to_view();
        } else {
            app.on_graph_click(mouse.column, mouse.row);
        }
    }
}
