// Dashboard side panels
//
// State for the category details and financial overview panels. Each panel
// remembers the router generation it was opened under; loads finishing for
// another generation are stale.

use ratatui::widgets::ListState;

use crate::api::{ApiResult, Category, EntryKind, EntryResponse};

/// Progress of a panel's data load
#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Loading,
    Ready(T),
    /// The requested record does not exist
    Missing,
    Failed(String),
}

impl<T> Load<T> {
    /// `Ok(None)` means the record does not exist
    pub fn from_result(result: ApiResult<Option<T>>) -> Self {
        match result {
            Ok(Some(data)) => Self::Ready(data),
            Ok(None) => Self::Missing,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// One profit or expense in the combined history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub kind: EntryKind,
    pub entry: EntryResponse,
}

/// Merge profits and expenses into one list, newest first
///
/// Entries on the same date keep profits ahead of expenses, each in the
/// order the server returned them.
pub fn merge_history(profits: Vec<EntryResponse>, expenses: Vec<EntryResponse>) -> Vec<HistoryItem> {
    let mut items: Vec<HistoryItem> = profits
        .into_iter()
        .map(|entry| HistoryItem {
            kind: EntryKind::Profit,
            entry,
        })
        .chain(expenses.into_iter().map(|entry| HistoryItem {
            kind: EntryKind::Expense,
            entry,
        }))
        .collect();
    items.sort_by(|a, b| b.entry.date.cmp(&a.entry.date));
    items
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPanelData {
    pub category: Category,
    pub entries: Vec<EntryResponse>,
}

impl CategoryPanelData {
    pub fn entry_kind(&self) -> EntryKind {
        self.category.kind.entry_kind()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// Destructive action waiting for a y/n answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteEntry { kind: EntryKind, entry_id: i64 },
    DeleteCategory { category_id: i64 },
}

/// Move a list selection by one, clamping at both ends
fn step_selection(state: &mut ListState, len: usize, forward: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let next = match (state.selected(), forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(idx), true) => (idx + 1).min(len - 1),
        (Some(idx), false) => idx.saturating_sub(1),
    };
    state.select(Some(next));
}

#[derive(Debug)]
pub struct CategoryPanel {
    pub category_id: i64,
    pub generation: u64,
    pub load: Load<CategoryPanelData>,
    pub list_state: ListState,
    pub confirm: Option<PendingConfirm>,
}

impl CategoryPanel {
    pub fn new(category_id: i64, generation: u64) -> Self {
        Self {
            category_id,
            generation,
            load: Load::Loading,
            list_state: ListState::default(),
            confirm: None,
        }
    }

    /// Install freshly loaded data, keeping the selection in range
    pub fn apply(&mut self, load: Load<CategoryPanelData>) {
        let len = load.ready().map_or(0, |d| d.entries.len());
        self.load = load;
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(idx) if idx >= len => self.list_state.select(Some(len - 1)),
            None => self.list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    pub fn select_next(&mut self) {
        let len = self.load.ready().map_or(0, |d| d.entries.len());
        step_selection(&mut self.list_state, len, true);
    }

    pub fn select_previous(&mut self) {
        let len = self.load.ready().map_or(0, |d| d.entries.len());
        step_selection(&mut self.list_state, len, false);
    }

    pub fn category(&self) -> Option<&Category> {
        self.load.ready().map(|d| &d.category)
    }

    pub fn selected_entry(&self) -> Option<(EntryKind, &EntryResponse)> {
        let data = self.load.ready()?;
        let entry = data.entries.get(self.list_state.selected()?)?;
        Some((data.entry_kind(), entry))
    }
}

#[derive(Debug)]
pub struct OverviewPanel {
    pub generation: u64,
    pub load: Load<Vec<HistoryItem>>,
    pub list_state: ListState,
}

impl OverviewPanel {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            load: Load::Loading,
            list_state: ListState::default(),
        }
    }

    pub fn apply(&mut self, load: Load<Vec<HistoryItem>>) {
        let has_items = load.ready().is_some_and(|items| !items.is_empty());
        self.load = load;
        self.list_state.select(has_items.then_some(0));
    }

    pub fn select_next(&mut self) {
        let len = self.load.ready().map_or(0, Vec::len);
        step_selection(&mut self.list_state, len, true);
    }

    pub fn select_previous(&mut self) {
        let len = self.load.ready().map_or(0, Vec::len);
        step_selection(&mut self.list_state, len, false);
    }
}
