// Form state and validation
//
// Login/registration, category and entry forms. Each form validates into the
// request type the API expects, or a message to show under the form.

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use super::panels::Load;
use crate::api::{
    Category, CategoryRequest, CategoryType, EntryKind, EntryRequest, EntryResponse, LoginRequest,
};
use crate::money::{amount_to_cents, cents_to_amount, format_cents_mask};

/// Username length accepted at registration
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

/// Shortest password accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Longest amount the cents mask accepts, in digits
const MAX_AMOUNT_DIGITS: u32 = 13;

/// Single-line text field with a char-based cursor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Display columns before the cursor, for placing the terminal cursor
    pub fn cursor_column(&self) -> usize {
        self.value[..self.byte_index(self.cursor)].width()
    }
}

// ============================================================================
// Login / registration
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub mode: AuthMode,
    pub username: TextInput,
    pub password: TextInput,
    pub focus: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, String> {
        let username = self.username.value().trim();
        let password = self.password.value();
        match self.mode {
            AuthMode::Login => {
                if username.is_empty() || password.is_empty() {
                    return Err("Username and password are required.".to_string());
                }
            }
            AuthMode::Register => {
                if !USERNAME_LEN.contains(&username.chars().count()) {
                    return Err(format!(
                        "Username must be between {} and {} characters long.",
                        USERNAME_LEN.start(),
                        USERNAME_LEN.end()
                    ));
                }
                if password.chars().count() < MIN_PASSWORD_LEN {
                    return Err(format!(
                        "Password must be at least {} characters long.",
                        MIN_PASSWORD_LEN
                    ));
                }
            }
        }
        Ok(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

// ============================================================================
// Category form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryField {
    #[default]
    Name,
    Type,
}

#[derive(Debug)]
pub struct CategoryForm {
    /// Id of the category being renamed, `None` when creating
    pub editing: Option<i64>,
    pub name: TextInput,
    pub kind: CategoryType,
    pub focus: CategoryField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl CategoryForm {
    pub fn create() -> Self {
        Self {
            editing: None,
            name: TextInput::default(),
            kind: CategoryType::Profit,
            focus: CategoryField::Name,
            error: None,
            submitting: false,
        }
    }

    pub fn edit(category: &Category) -> Self {
        Self {
            editing: Some(category.id),
            name: TextInput::with_value(&category.name),
            kind: category.kind,
            ..Self::create()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Category"
        } else {
            "New Category"
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            CategoryField::Name => CategoryField::Type,
            CategoryField::Type => CategoryField::Name,
        };
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn validate(&self) -> Result<CategoryRequest, String> {
        if self.name.is_blank() {
            return Err("Category name is required.".to_string());
        }
        Ok(CategoryRequest {
            name: self.name.value().trim().to_string(),
            kind: self.kind,
        })
    }
}

// ============================================================================
// Entry form
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryField {
    #[default]
    Description,
    Amount,
    Date,
    Category,
}

impl EntryField {
    fn next(self) -> Self {
        match self {
            Self::Description => Self::Amount,
            Self::Amount => Self::Date,
            Self::Date => Self::Category,
            Self::Category => Self::Description,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Description => Self::Category,
            Self::Amount => Self::Description,
            Self::Date => Self::Amount,
            Self::Category => Self::Date,
        }
    }
}

#[derive(Debug)]
pub struct EntryForm {
    pub kind: EntryKind,
    /// Id of the entry being edited, `None` when creating
    pub editing: Option<i64>,
    pub description: TextInput,
    pub amount_cents: u64,
    pub date: TextInput,
    pub categories: Load<Vec<Category>>,
    /// Category to preselect once the list arrives
    preferred_category: Option<i64>,
    pub category_index: usize,
    pub focus: EntryField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl EntryForm {
    pub fn create(kind: EntryKind, today: NaiveDate) -> Self {
        Self {
            kind,
            editing: None,
            description: TextInput::default(),
            amount_cents: 0,
            date: TextInput::with_value(&today.format("%Y-%m-%d").to_string()),
            categories: Load::Loading,
            preferred_category: None,
            category_index: 0,
            focus: EntryField::Description,
            error: None,
            submitting: false,
        }
    }

    /// Form pre-filled from an existing entry
    pub fn edit(kind: EntryKind, entry: &EntryResponse) -> Self {
        let request = EntryRequest::from_response(entry);
        Self {
            editing: Some(entry.id),
            description: TextInput::with_value(&request.description),
            amount_cents: amount_to_cents(request.amount),
            preferred_category: Some(request.category_id),
            ..Self::create(kind, request.date)
        }
    }

    pub fn title(&self) -> String {
        match self.editing {
            Some(_) => format!("Edit {}", self.kind.label()),
            None => format!("New {}", self.kind.label()),
        }
    }

    /// The form cannot be edited or submitted right now
    pub fn is_disabled(&self) -> bool {
        self.submitting || self.categories.is_loading()
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_field(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn amount_display(&self) -> String {
        format_cents_mask(self.amount_cents)
    }

    pub fn push_amount_digit(&mut self, digit: char) {
        let Some(d) = digit.to_digit(10) else {
            return;
        };
        if self.amount_cents.checked_ilog10().unwrap_or(0) + 1 >= MAX_AMOUNT_DIGITS {
            return;
        }
        self.amount_cents = self.amount_cents * 10 + d as u64;
    }

    pub fn pop_amount_digit(&mut self) {
        self.amount_cents /= 10;
    }

    /// Install the category choices, preselecting the edited entry's category
    pub fn set_categories(&mut self, load: Load<Vec<Category>>) {
        self.category_index = match (&load, self.preferred_category) {
            (Load::Ready(categories), Some(id)) => {
                categories.iter().position(|c| c.id == id).unwrap_or(0)
            }
            _ => 0,
        };
        self.categories = load;
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.ready().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        self.category_index = if forward {
            (self.category_index + 1) % len
        } else {
            (self.category_index + len - 1) % len
        };
    }

    /// Why an entry of this kind cannot be filed yet
    pub fn no_categories_message(&self) -> &'static str {
        match self.kind {
            EntryKind::Profit => "Create a profit category first.",
            EntryKind::Expense => "Create an expense category first.",
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories.ready()?.get(self.category_index)
    }

    pub fn validate(&self) -> Result<EntryRequest, String> {
        if self.description.is_blank() {
            return Err("Description is required.".to_string());
        }
        if self.amount_cents == 0 {
            return Err("Amount must be a positive number.".to_string());
        }
        let date = NaiveDate::parse_from_str(self.date.value().trim(), "%Y-%m-%d")
            .map_err(|_| "Date must be in YYYY-MM-DD format.".to_string())?;
        let category = match &self.categories {
            Load::Ready(categories) if categories.is_empty() => {
                return Err(self.no_categories_message().to_string());
            }
            Load::Ready(_) => self
                .selected_category()
                .ok_or_else(|| "Please select a category.".to_string())?,
            Load::Failed(message) => return Err(message.clone()),
            Load::Loading | Load::Missing => {
                return Err("Categories are still loading.".to_string());
            }
        };
        Ok(EntryRequest {
            description: self.description.value().trim().to_string(),
            amount: cents_to_amount(self.amount_cents),
            date,
            category_id: category.id,
        })
    }
}

/// Modal overlay shown above the dashboard
#[derive(Debug)]
pub enum Modal {
    Category(CategoryForm),
    Entry(EntryForm),
}

impl Modal {
    pub fn is_submitting(&self) -> bool {
        match self {
            Self::Category(form) => form.submitting,
            Self::Entry(form) => form.submitting,
        }
    }

    pub fn set_error(&mut self, message: String) {
        match self {
            Self::Category(form) => {
                form.error = Some(message);
                form.submitting = false;
            }
            Self::Entry(form) => {
                form.error = Some(message);
                form.submitting = false;
            }
        }
    }
}
