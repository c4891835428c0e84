// Application state management
//
// This module contains the main AppState struct: the login screen, the
// dashboard (summary, graph renderer, view router, panels, modals) and the
// glue that applies finished API requests to them.

pub mod config;
pub mod dispatcher;
pub mod event;
pub mod forms;
pub mod panels;
pub mod router;

pub use config::GraphSettings;

use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{EntryKind, FinancialSummary};
use crate::graph::{build_graph, GraphData, GraphRenderer, CENTER_NODE_ID};
use config::{STATUS_MESSAGE_DURATION, TICK_INTERVAL_MS};
use dispatcher::{ApiEvent, Dispatcher, RequestKind};
use forms::{AuthMode, CategoryForm, EntryForm, LoginForm, Modal};
use panels::{CategoryPanel, Load, OverviewPanel, PendingConfirm};
use router::{DashboardView, DataChange, ViewRouter};

/// Message shown after a forced logout
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// Progress of the summary behind the graph
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryState {
    Loading,
    Ready(FinancialSummary),
    Failed(String),
}

/// Transient line in the banner
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    pub screen: Screen,

    pub login: LoginForm,

    pub router: ViewRouter,

    pub summary: SummaryState,

    /// Graph built from the last summary; `None` while loading or failed
    pub graph: Option<GraphData>,

    pub renderer: GraphRenderer,

    pub category_panel: Option<CategoryPanel>,

    pub overview_panel: Option<OverviewPanel>,

    pub modal: Option<Modal>,

    /// Graph visual settings (animations, labels)
    pub settings: GraphSettings,

    /// Node index that keyboard navigation has focused
    pub focused_node: Option<usize>,

    /// Pulse phase for edge animation (0.0 ~ 1.0)
    pub pulse_phase: f32,

    /// Last tick time for pulse animation
    pub last_tick: Instant,

    /// Previous frame, used to advance the layout and fit animation
    last_frame: Instant,

    pub status: Option<StatusMessage>,

    dispatcher: Dispatcher,
}

impl AppState {
    /// Create the app, going straight to the dashboard when a token is stored
    pub fn new(dispatcher: Dispatcher) -> Self {
        let now = Instant::now();
        let has_token = dispatcher.client().tokens().is_present();

        let mut state = Self {
            running: true,
            screen: Screen::Login,
            login: LoginForm::default(),
            router: ViewRouter::new(),
            summary: SummaryState::Loading,
            graph: None,
            renderer: GraphRenderer::new(),
            category_panel: None,
            overview_panel: None,
            modal: None,
            settings: GraphSettings::default(),
            focused_node: None,
            pulse_phase: 0.0,
            last_tick: now,
            last_frame: now,
            status: None,
            dispatcher,
        };

        if has_token {
            state.enter_dashboard();
        }
        state
    }

    /// Update state once per frame
    pub fn on_tick(&mut self) {
        let now = Instant::now();

        let elapsed_tick = now.duration_since(self.last_tick).as_millis();
        if elapsed_tick >= TICK_INTERVAL_MS {
            self.last_tick = now;

            // Increment pulse phase (0.0 ~ 1.0)
            self.pulse_phase += 0.05;
            if self.pulse_phase >= 1.0 {
                self.pulse_phase = 0.0;
            }
        }

        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        self.renderer.tick(dt);

        if self
            .status
            .as_ref()
            .is_some_and(|s| now.duration_since(s.shown_at) >= STATUS_MESSAGE_DURATION)
        {
            self.status = None;
        }

        for event in self.dispatcher.poll() {
            self.apply_event(event);
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    /// Whether any request the user is waiting on is running
    pub fn is_busy(&self) -> bool {
        self.summary == SummaryState::Loading
            || [RequestKind::Auth, RequestKind::Summary, RequestKind::Mutation]
                .iter()
                .any(|kind| self.dispatcher.is_in_flight(*kind))
    }

    pub fn is_auth_pending(&self) -> bool {
        self.dispatcher.is_in_flight(RequestKind::Auth)
    }

    // ------------------------------------------------------------------
    // Finished requests
    // ------------------------------------------------------------------

    pub fn apply_event(&mut self, event: ApiEvent) {
        if event.is_auth_failure() && self.screen == Screen::Dashboard {
            self.force_logout(SESSION_EXPIRED_MESSAGE);
            return;
        }

        match event {
            ApiEvent::Authenticated(result) => {
                self.login.submitting = false;
                match result {
                    Ok(()) => {
                        info!(mode = ?self.login.mode, "Authenticated");
                        self.login = LoginForm::default();
                        self.enter_dashboard();
                        self.set_status("Logged in.", false);
                    }
                    Err(e) => {
                        warn!(error = %e, "Authentication failed");
                        self.login.error = Some(e.to_string());
                    }
                }
            }
            ApiEvent::Summary(result) => {
                if self.screen != Screen::Dashboard {
                    debug!("Dropping summary received after logout");
                    return;
                }
                self.apply_summary(result.map_err(|e| e.to_string()));
            }
            ApiEvent::CategoryPanel { generation, result } => match self.category_panel.as_mut() {
                Some(panel) if panel.generation == generation => {
                    panel.apply(Load::from_result(result))
                }
                _ => debug!(generation, "Dropping stale category panel result"),
            },
            ApiEvent::Overview { generation, result } => match self.overview_panel.as_mut() {
                Some(panel) if panel.generation == generation => {
                    panel.apply(Load::from_result(result.map(Some)))
                }
                _ => debug!(generation, "Dropping stale overview result"),
            },
            ApiEvent::FormCategories {
                category_type,
                result,
            } => match self.modal.as_mut() {
                Some(Modal::Entry(form)) if form.kind.category_type() == category_type => {
                    form.set_categories(match result {
                        Ok(categories) => Load::Ready(categories),
                        Err(e) => Load::Failed(e.to_string()),
                    });
                }
                _ => debug!("Dropping categories for a closed form"),
            },
            ApiEvent::Mutation {
                change,
                success_message,
                result,
            } => match result {
                Ok(()) => {
                    // Only the form that submitted closes; one opened since stays
                    if self.modal.as_ref().is_some_and(Modal::is_submitting) {
                        self.modal = None;
                    }
                    if let Some(panel) = self.category_panel.as_mut() {
                        panel.confirm = None;
                    }
                    self.set_status(success_message, false);
                    self.on_data_changed(change);
                }
                Err(e) => match self.modal.as_mut().filter(|m| m.is_submitting()) {
                    Some(modal) => modal.set_error(e.to_string()),
                    None => self.set_status(e.to_string(), true),
                },
            },
        }
    }

    fn apply_summary(&mut self, result: Result<FinancialSummary, String>) {
        match result {
            Ok(summary) => {
                let graph = build_graph(&summary);
                self.renderer.mount(&graph);
                self.focused_node = self
                    .focused_node
                    .filter(|&idx| idx < graph.nodes.len());
                self.graph = Some(graph);
                self.summary = SummaryState::Ready(summary);
            }
            Err(message) => {
                warn!(error = %message, "Summary fetch failed");
                // No stale graph next to an error
                self.renderer.dispose();
                self.graph = None;
                self.focused_node = None;
                self.summary = SummaryState::Failed(message);
            }
        }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    fn enter_dashboard(&mut self) {
        self.screen = Screen::Dashboard;
        self.refresh_summary();
    }

    pub fn submit_login(&mut self) {
        if self.login.submitting || self.is_auth_pending() {
            return;
        }
        let request = match self.login.validate() {
            Ok(request) => request,
            Err(message) => {
                self.login.error = Some(message);
                return;
            }
        };
        self.login.error = None;
        let started = match self.login.mode {
            AuthMode::Login => self.dispatcher.login(request),
            AuthMode::Register => self.dispatcher.register(request),
        };
        self.login.submitting = started;
    }

    /// Explicit logout
    pub fn logout(&mut self) {
        info!("Logging out");
        self.end_session(None);
    }

    /// Logout forced by a rejected session
    pub fn force_logout(&mut self, message: &str) {
        warn!("Session rejected, returning to login");
        self.end_session(Some(message.to_string()));
    }

    fn end_session(&mut self, message: Option<String>) {
        if let Err(e) = self.dispatcher.client().tokens().clear() {
            warn!(error = %e, "Failed to remove token file");
        }
        self.renderer.dispose();
        self.router.reset();
        self.dispatcher.reset();
        self.graph = None;
        self.summary = SummaryState::Loading;
        self.category_panel = None;
        self.overview_panel = None;
        self.modal = None;
        self.focused_node = None;
        self.status = None;
        self.login = LoginForm {
            error: message,
            ..LoginForm::default()
        };
        self.screen = Screen::Login;
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Re-fetch the summary and reload whichever panel is open
    pub fn refresh(&mut self) {
        self.refresh_summary();
        self.reload_panel();
    }

    fn refresh_summary(&mut self) {
        if !matches!(self.summary, SummaryState::Ready(_)) {
            self.summary = SummaryState::Loading;
        }
        self.dispatcher.fetch_summary();
    }

    fn on_data_changed(&mut self, change: DataChange) {
        if self.router.on_data_changed(change) {
            self.sync_panels();
        } else {
            self.reload_panel();
        }
        self.refresh_summary();
    }

    /// Open or close panels to match the router after a transition
    fn sync_panels(&mut self) {
        let generation = self.router.generation();
        self.category_panel = None;
        self.overview_panel = None;
        match self.router.view() {
            DashboardView::Graph => {}
            DashboardView::CategoryDetails { category_id } => {
                self.category_panel = Some(CategoryPanel::new(category_id, generation));
                self.dispatcher.load_category_panel(generation, category_id);
            }
            DashboardView::FinancialOverview => {
                self.overview_panel = Some(OverviewPanel::new(generation));
                self.dispatcher.load_overview(generation);
            }
        }
    }

    fn reload_panel(&mut self) {
        if let Some(panel) = &self.category_panel {
            self.dispatcher
                .load_category_panel(panel.generation, panel.category_id);
        }
        if let Some(panel) = &self.overview_panel {
            self.dispatcher.load_overview(panel.generation);
        }
    }

    /// Route a node click; the center node is matched here by id
    pub fn navigate_to_node(&mut self, node_id: &str) {
        if self.router.on_node_click(node_id) {
            self.sync_panels();
        }
    }

    /// Pointer click on the graph canvas
    pub fn on_graph_click(&mut self, column: u16, row: u16) {
        let mut clicked: Option<String> = None;
        let reported = self
            .renderer
            .handle_click(column, row, |id| clicked = Some(id.to_string()));
        if !reported {
            let hits = self.renderer.hit_test(column, row);
            if let [id] = hits.as_slice() {
                if id == CENTER_NODE_ID {
                    clicked = Some(id.clone());
                }
            }
        }
        if let Some(id) = clicked {
            self.focused_node = self
                .graph
                .as_ref()
                .and_then(|g| g.nodes.iter().position(|n| n.id == id));
            self.navigate_to_node(&id);
        }
    }

    pub fn close_panel(&mut self) {
        if self.router.on_close() {
            self.sync_panels();
        }
    }

    fn node_count(&self) -> usize {
        self.graph.as_ref().map_or(0, |g| g.nodes.len())
    }

    pub fn focus_next_node(&mut self) {
        let count = self.node_count();
        if count == 0 {
            self.focused_node = None;
            return;
        }
        self.focused_node = Some(match self.focused_node {
            None => 0,
            Some(idx) => (idx + 1) % count,
        });
    }

    pub fn focus_previous_node(&mut self) {
        let count = self.node_count();
        if count == 0 {
            self.focused_node = None;
            return;
        }
        self.focused_node = Some(match self.focused_node {
            None | Some(0) => count - 1,
            Some(idx) => idx - 1,
        });
    }

    pub fn activate_focused_node(&mut self) {
        let id = self
            .focused_node
            .and_then(|idx| self.graph.as_ref()?.nodes.get(idx))
            .map(|node| node.id.clone());
        if let Some(id) = id {
            self.navigate_to_node(&id);
        }
    }

    // ------------------------------------------------------------------
    // Modals
    // ------------------------------------------------------------------

    pub fn open_category_form(&mut self) {
        self.modal = Some(Modal::Category(CategoryForm::create()));
    }

    pub fn open_entry_form(&mut self, kind: EntryKind) {
        let form = EntryForm::create(kind, Local::now().date_naive());
        self.modal = Some(Modal::Entry(form));
        self.dispatcher.load_form_categories(kind.category_type());
    }

    /// Edit the entry selected in the category panel
    pub fn open_edit_entry(&mut self) {
        let Some((kind, entry)) = self
            .category_panel
            .as_ref()
            .and_then(|p| p.selected_entry())
        else {
            return;
        };
        let form = EntryForm::edit(kind, entry);
        self.modal = Some(Modal::Entry(form));
        self.dispatcher.load_form_categories(kind.category_type());
    }

    /// Rename or retype the category shown in the panel
    pub fn open_edit_category(&mut self) {
        if let Some(category) = self.category_panel.as_ref().and_then(|p| p.category()) {
            self.modal = Some(Modal::Category(CategoryForm::edit(category)));
        }
    }

    pub fn cancel_modal(&mut self) {
        if self.modal.as_ref().is_some_and(|m| m.is_submitting()) {
            return;
        }
        self.modal = None;
    }

    pub fn submit_modal(&mut self) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        if modal.is_submitting() {
            return;
        }
        let dispatcher = &mut self.dispatcher;
        match modal {
            Modal::Category(form) => match form.validate() {
                Ok(request) => {
                    form.error = None;
                    form.submitting = match form.editing {
                        Some(id) => dispatcher.update_category(id, request),
                        None => dispatcher.create_category(request),
                    };
                }
                Err(message) => form.error = Some(message),
            },
            Modal::Entry(form) => {
                if form.is_disabled() {
                    return;
                }
                match form.validate() {
                    Ok(request) => {
                        form.error = None;
                        form.submitting = match form.editing {
                            Some(id) => dispatcher.update_entry(form.kind, id, request),
                            None => dispatcher.create_entry(form.kind, request),
                        };
                    }
                    Err(message) => form.error = Some(message),
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Deletions
    // ------------------------------------------------------------------

    pub fn request_delete_entry(&mut self) {
        let Some(panel) = self.category_panel.as_mut() else {
            return;
        };
        if let Some((kind, entry)) = panel.selected_entry() {
            let entry_id = entry.id;
            panel.confirm = Some(PendingConfirm::DeleteEntry { kind, entry_id });
        }
    }

    pub fn request_delete_category(&mut self) {
        let Some(panel) = self.category_panel.as_mut() else {
            return;
        };
        if panel.category().is_some() {
            panel.confirm = Some(PendingConfirm::DeleteCategory {
                category_id: panel.category_id,
            });
        }
    }

    /// Answer the pending confirmation
    pub fn resolve_confirm(&mut self, accepted: bool) {
        let Some(confirm) = self.category_panel.as_mut().and_then(|p| p.confirm.take()) else {
            return;
        };
        if !accepted {
            return;
        }
        let started = match confirm {
            PendingConfirm::DeleteEntry { kind, entry_id } => {
                self.dispatcher.delete_entry(kind, entry_id)
            }
            PendingConfirm::DeleteCategory { category_id } => {
                self.dispatcher.delete_category(category_id)
            }
        };
        if !started {
            self.set_status("Another change is still being saved.", true);
        }
    }

    /// Description of the focused node, shown in the status bar
    pub fn focused_node_title(&self) -> Option<&str> {
        let node = self.graph.as_ref()?.nodes.get(self.focused_node?)?;
        Some(node.title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CategoryTotal;
    use crate::api::{
        ApiClient, ApiError, Category, CategoryType, EntryResponse, TokenStore,
    };
    use chrono::NaiveDate;
    use panels::CategoryPanelData;
    use proptest::prelude::*;
    use std::time::Duration;
    use tokio::runtime::Runtime;

    /// App wired to an address nothing listens on
    struct Harness {
        app: AppState,
        _runtime: Runtime,
        _dir: tempfile::TempDir,
    }

    fn harness(with_token: bool) -> Harness {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let tokens = TokenStore::open(dir.path().join("token")).unwrap();
        if with_token {
            tokens.save("token").unwrap();
        }
        let client =
            ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1), tokens, || {}).unwrap();
        let dispatcher = Dispatcher::new(runtime.handle().clone(), client);
        Harness {
            app: AppState::new(dispatcher),
            _runtime: runtime,
            _dir: dir,
        }
    }

    fn summary() -> FinancialSummary {
        FinancialSummary {
            total_profits: 1000.0,
            total_expenses: 400.0,
            net_worth: 600.0,
            profits_by_category: vec![CategoryTotal::new(1, 1000.0)],
            expenses_by_category: vec![CategoryTotal::new(2, 400.0)],
            all_categories: vec![
                Category {
                    id: 1,
                    name: "Salary".to_string(),
                    kind: CategoryType::Profit,
                },
                Category {
                    id: 2,
                    name: "Rent".to_string(),
                    kind: CategoryType::Expense,
                },
            ],
        }
    }

    fn rent_entries() -> CategoryPanelData {
        let rent = summary().all_categories[1].clone();
        CategoryPanelData {
            entries: vec![EntryResponse {
                id: 7,
                description: "June".to_string(),
                amount: 400.0,
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                category: rent.clone(),
            }],
            category: rent,
        }
    }

    #[test]
    fn test_starts_on_login_without_token() {
        let h = harness(false);
        assert_eq!(h.app.screen, Screen::Login);
    }

    #[test]
    fn test_starts_on_dashboard_with_token() {
        let h = harness(true);
        assert_eq!(h.app.screen, Screen::Dashboard);
        assert_eq!(h.app.summary, SummaryState::Loading);
    }

    #[test]
    fn test_summary_mounts_graph() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        assert!(h.app.renderer.is_mounted());
        assert_eq!(h.app.graph.as_ref().unwrap().nodes.len(), 3);
        assert!(matches!(h.app.summary, SummaryState::Ready(_)));
    }

    #[test]
    fn test_summary_failure_hides_graph() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        h.app.apply_event(ApiEvent::Summary(Err(ApiError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        })));
        assert!(!h.app.renderer.is_mounted());
        assert!(h.app.graph.is_none());
        assert_eq!(h.app.summary, SummaryState::Failed("boom".to_string()));
    }

    #[test]
    fn test_auth_failure_forces_logout() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        h.app.navigate_to_node("cat_2");
        h.app.apply_event(ApiEvent::Summary(Err(ApiError::AuthFailed)));

        assert_eq!(h.app.screen, Screen::Login);
        assert_eq!(h.app.login.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(!h.app.renderer.is_mounted());
        assert!(h.app.router.is_graph());
        assert!(h.app.category_panel.is_none());
        assert!(!h.app.dispatcher.client().tokens().is_present());
    }

    #[test]
    fn test_rejected_panel_load_forces_logout() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        h.app.navigate_to_node("cat_2");
        let generation = h.app.router.generation();
        h.app.apply_event(ApiEvent::CategoryPanel {
            generation,
            result: Err(ApiError::AuthFailed),
        });

        assert_eq!(h.app.screen, Screen::Login);
        assert_eq!(h.app.login.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert!(h.app.category_panel.is_none());
        assert!(h.app.router.is_graph());
    }

    #[test]
    fn test_panel_load_without_session_returns_to_login() {
        let mut h = harness(false);
        // Dashboard still showing after the token went away
        h.app.screen = Screen::Dashboard;
        h.app.navigate_to_node("cat_2");

        let deadline = Instant::now() + Duration::from_secs(5);
        while h.app.screen == Screen::Dashboard && Instant::now() < deadline {
            h.app.on_tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(h.app.screen, Screen::Login);
        assert_eq!(h.app.login.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
    }

    #[test]
    fn test_summary_refetch_shows_busy() {
        let mut h = harness(true);
        // The startup fetch fails fast against the closed port
        let deadline = Instant::now() + Duration::from_secs(5);
        while h.app.dispatcher.is_in_flight(RequestKind::Summary) && Instant::now() < deadline {
            h.app.on_tick();
            std::thread::sleep(Duration::from_millis(10));
        }
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        assert!(!h.app.is_busy());

        h.app.refresh();
        assert!(matches!(h.app.summary, SummaryState::Ready(_)));
        assert!(h.app.is_busy());
    }

    #[test]
    fn test_mutation_result_closes_only_submitting_form() {
        let mut h = harness(true);
        h.app.navigate_to_node("cat_2");

        // A confirmed delete lands while a new form is being filled in
        h.app.open_category_form();
        h.app.apply_event(ApiEvent::Mutation {
            change: DataChange::EntryDeleted,
            success_message: "Expense deleted.".to_string(),
            result: Ok(()),
        });
        assert!(matches!(h.app.modal, Some(Modal::Category(_))));
        assert_eq!(h.app.status.as_ref().unwrap().text, "Expense deleted.");

        if let Some(Modal::Category(form)) = h.app.modal.as_mut() {
            form.submitting = true;
        }
        h.app.apply_event(ApiEvent::Mutation {
            change: DataChange::CategoryCreated,
            success_message: "Category \"Food\" created.".to_string(),
            result: Ok(()),
        });
        assert!(h.app.modal.is_none());
    }

    #[test]
    fn test_node_navigation_opens_panels() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));

        h.app.navigate_to_node("cat_2");
        let panel = h.app.category_panel.as_ref().unwrap();
        assert_eq!(panel.category_id, 2);
        assert!(panel.load.is_loading());

        h.app.close_panel();
        assert!(h.app.category_panel.is_none());

        h.app.navigate_to_node(CENTER_NODE_ID);
        assert!(h.app.overview_panel.is_some());
    }

    #[test]
    fn test_stale_panel_result_is_dropped() {
        let mut h = harness(true);
        h.app.navigate_to_node("cat_2");
        let old_generation = h.app.router.generation();
        h.app.close_panel();
        h.app.navigate_to_node("cat_1");

        h.app.apply_event(ApiEvent::CategoryPanel {
            generation: old_generation,
            result: Ok(Some(rent_entries())),
        });
        assert!(h.app.category_panel.as_ref().unwrap().load.is_loading());

        let current = h.app.router.generation();
        h.app.apply_event(ApiEvent::CategoryPanel {
            generation: current,
            result: Ok(None),
        });
        assert_eq!(h.app.category_panel.as_ref().unwrap().load, Load::Missing);
    }

    #[test]
    fn test_category_deleted_returns_to_graph() {
        let mut h = harness(true);
        h.app.navigate_to_node("cat_2");
        h.app.apply_event(ApiEvent::Mutation {
            change: DataChange::CategoryDeleted,
            success_message: "Category deleted.".to_string(),
            result: Ok(()),
        });
        assert!(h.app.router.is_graph());
        assert!(h.app.category_panel.is_none());
        assert_eq!(h.app.status.as_ref().unwrap().text, "Category deleted.");
    }

    #[test]
    fn test_entry_change_keeps_panel_open() {
        let mut h = harness(true);
        h.app.navigate_to_node("net_worth");
        h.app.apply_event(ApiEvent::Mutation {
            change: DataChange::EntryCreated,
            success_message: "ok".to_string(),
            result: Ok(()),
        });
        assert_eq!(h.app.router.view(), DashboardView::FinancialOverview);
        assert!(h.app.overview_panel.is_some());
    }

    #[test]
    fn test_failed_mutation_keeps_modal_with_error() {
        let mut h = harness(true);
        h.app.open_category_form();
        if let Some(Modal::Category(form)) = h.app.modal.as_mut() {
            form.submitting = true;
        }
        h.app.apply_event(ApiEvent::Mutation {
            change: DataChange::CategoryCreated,
            success_message: String::new(),
            result: Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: "Name taken".to_string(),
            }),
        });
        match h.app.modal.as_ref() {
            Some(Modal::Category(form)) => {
                assert_eq!(form.error.as_deref(), Some("Name taken"));
                assert!(!form.submitting);
            }
            _ => panic!("modal should stay open"),
        }
    }

    #[test]
    fn test_form_categories_reach_matching_form_only() {
        let mut h = harness(true);
        h.app.open_entry_form(EntryKind::Expense);
        h.app.apply_event(ApiEvent::FormCategories {
            category_type: CategoryType::Profit,
            result: Ok(vec![]),
        });
        match h.app.modal.as_ref() {
            Some(Modal::Entry(form)) => assert!(form.categories.is_loading()),
            _ => panic!("entry form expected"),
        }
        h.app.apply_event(ApiEvent::FormCategories {
            category_type: CategoryType::Expense,
            result: Ok(vec![summary().all_categories[1].clone()]),
        });
        match h.app.modal.as_ref() {
            Some(Modal::Entry(form)) => assert_eq!(form.selected_category().unwrap().id, 2),
            _ => panic!("entry form expected"),
        }
    }

    #[test]
    fn test_delete_confirmation_can_be_declined() {
        let mut h = harness(true);
        h.app.navigate_to_node("cat_2");
        let generation = h.app.router.generation();
        h.app.apply_event(ApiEvent::CategoryPanel {
            generation,
            result: Ok(Some(rent_entries())),
        });
        h.app.request_delete_entry();
        assert_eq!(
            h.app.category_panel.as_ref().unwrap().confirm,
            Some(PendingConfirm::DeleteEntry {
                kind: EntryKind::Expense,
                entry_id: 7
            })
        );
        h.app.resolve_confirm(false);
        assert!(h.app.category_panel.as_ref().unwrap().confirm.is_none());
        assert!(!h.app.dispatcher.is_in_flight(RequestKind::Mutation));
    }

    #[test]
    fn test_login_validation_blocks_submit() {
        let mut h = harness(false);
        h.app.submit_login();
        assert!(h.app.login.error.is_some());
        assert!(!h.app.login.submitting);
        assert!(!h.app.is_auth_pending());
    }

    #[test]
    fn test_explicit_logout_clears_session() {
        let mut h = harness(true);
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        h.app.logout();
        assert_eq!(h.app.screen, Screen::Login);
        assert!(h.app.login.error.is_none());
        assert!(h.app.graph.is_none());

        // A summary that lands after logout is ignored
        h.app.apply_event(ApiEvent::Summary(Ok(summary())));
        assert!(!h.app.renderer.is_mounted());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Keyboard focus always points at an existing node
        #[test]
        fn prop_node_focus_stays_in_range(steps in prop::collection::vec(any::<bool>(), 0..30)) {
            let mut h = harness(true);
            h.app.apply_event(ApiEvent::Summary(Ok(summary())));
            for forward in steps {
                if forward {
                    h.app.focus_next_node();
                } else {
                    h.app.focus_previous_node();
                }
                let idx = h.app.focused_node.unwrap();
                prop_assert!(idx < 3);
            }
        }
    }
}
