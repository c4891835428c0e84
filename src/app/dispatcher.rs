// Request dispatcher
//
// Bridges the synchronous render loop and the async API client. Requests run
// as tasks on the tokio runtime and report back over an unbounded channel
// that the UI drains once per frame. User-triggered requests are limited to
// one in flight per kind. Every result is tagged with the session that
// started it, so nothing from before a logout reaches the next session.

use std::collections::HashSet;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::panels::{merge_history, CategoryPanelData, HistoryItem};
use super::router::DataChange;
use crate::api::{
    ApiClient, ApiError, ApiResult, Category, CategoryRequest, CategoryType, EntryKind,
    EntryRequest, FinancialSummary, LoginRequest,
};

/// Request families that are deduplicated while in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Auth,
    Summary,
    Mutation,
}

/// Completion of a background request
#[derive(Debug)]
pub enum ApiEvent {
    /// Login or registration finished; the token is already persisted
    Authenticated(ApiResult<()>),
    Summary(ApiResult<FinancialSummary>),
    /// `Ok(None)` when the category no longer exists
    CategoryPanel {
        generation: u64,
        result: ApiResult<Option<CategoryPanelData>>,
    },
    Overview {
        generation: u64,
        result: ApiResult<Vec<HistoryItem>>,
    },
    FormCategories {
        category_type: CategoryType,
        result: ApiResult<Vec<Category>>,
    },
    Mutation {
        change: DataChange,
        success_message: String,
        result: ApiResult<()>,
    },
}

impl ApiEvent {
    fn kind(&self) -> Option<RequestKind> {
        match self {
            Self::Authenticated(_) => Some(RequestKind::Auth),
            Self::Summary(_) => Some(RequestKind::Summary),
            Self::Mutation { .. } => Some(RequestKind::Mutation),
            Self::CategoryPanel { .. } | Self::Overview { .. } | Self::FormCategories { .. } => {
                None
            }
        }
    }

    /// Whether this event reports that the session was rejected
    pub fn is_auth_failure(&self) -> bool {
        let failed = |e: &ApiError| e.is_auth_failure();
        match self {
            Self::Authenticated(Err(e))
            | Self::Summary(Err(e))
            | Self::CategoryPanel { result: Err(e), .. }
            | Self::Overview { result: Err(e), .. }
            | Self::FormCategories { result: Err(e), .. }
            | Self::Mutation { result: Err(e), .. } => failed(e),
            _ => false,
        }
    }
}

pub struct Dispatcher {
    runtime: Handle,
    client: ApiClient,
    tx: UnboundedSender<(u64, ApiEvent)>,
    rx: UnboundedReceiver<(u64, ApiEvent)>,
    /// Bumped by `reset`; results from older sessions are dropped
    session: u64,
    in_flight: HashSet<RequestKind>,
    /// A summary refresh was asked for while one was already running
    summary_stale: bool,
}

impl Dispatcher {
    pub fn new(runtime: Handle, client: ApiClient) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            runtime,
            client,
            tx,
            rx,
            session: 0,
            in_flight: HashSet::new(),
            summary_stale: false,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_in_flight(&self, kind: RequestKind) -> bool {
        self.in_flight.contains(&kind)
    }

    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let session = self.session;
        self.runtime.spawn(async move {
            // The receiver only goes away on shutdown
            let _ = tx.send((session, future.await));
        });
    }

    /// Spawn unless a request of the same kind is still running
    fn submit<F>(&mut self, kind: RequestKind, future: F) -> bool
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        if !self.in_flight.insert(kind) {
            debug!(?kind, "Request already in flight, ignoring");
            return false;
        }
        self.spawn(future);
        true
    }

    /// Collect every finished request of the current session
    ///
    /// A summary refresh requested while another was running is started
    /// here once the first one lands.
    pub fn poll(&mut self) -> Vec<ApiEvent> {
        let mut events = Vec::new();
        while let Ok((session, event)) = self.rx.try_recv() {
            if session != self.session {
                debug!(session, current = self.session, "Dropping result from an ended session");
                continue;
            }
            if let Some(kind) = event.kind() {
                self.in_flight.remove(&kind);
            }
            events.push(event);
        }
        if self.summary_stale && !self.is_in_flight(RequestKind::Summary) {
            self.summary_stale = false;
            self.fetch_summary();
        }
        events
    }

    /// Start a new session, e.g. after logout
    ///
    /// Tasks already running still complete but `poll` discards their
    /// results.
    pub fn reset(&mut self) {
        self.session = self.session.wrapping_add(1);
        self.in_flight.clear();
        self.summary_stale = false;
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub fn login(&mut self, request: LoginRequest) -> bool {
        let client = self.client.clone();
        self.submit(RequestKind::Auth, async move {
            let result: ApiResult<()> = async {
                let response = client.login(&request).await?;
                client.tokens().save(&response.token)?;
                Ok(())
            }
            .await;
            ApiEvent::Authenticated(result)
        })
    }

    pub fn register(&mut self, request: LoginRequest) -> bool {
        let client = self.client.clone();
        self.submit(RequestKind::Auth, async move {
            let result: ApiResult<()> = async {
                let response = client.register(&request).await?;
                client.tokens().save(&response.token)?;
                Ok(())
            }
            .await;
            ApiEvent::Authenticated(result)
        })
    }

    // ------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------

    pub fn fetch_summary(&mut self) {
        if self.is_in_flight(RequestKind::Summary) {
            self.summary_stale = true;
            return;
        }
        let client = self.client.clone();
        self.submit(RequestKind::Summary, async move {
            ApiEvent::Summary(client.summary().await)
        });
    }

    pub fn load_category_panel(&mut self, generation: u64, category_id: i64) {
        let client = self.client.clone();
        self.spawn(async move {
            let result: ApiResult<Option<CategoryPanelData>> = async {
                let categories = client.list_categories().await?;
                let Some(category) = categories.into_iter().find(|c| c.id == category_id) else {
                    return Ok(None);
                };
                let entries = client
                    .entries_by_category(category.kind.entry_kind(), category.id)
                    .await?;
                Ok(Some(CategoryPanelData { category, entries }))
            }
            .await;
            ApiEvent::CategoryPanel { generation, result }
        });
    }

    pub fn load_overview(&mut self, generation: u64) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = tokio::try_join!(
                client.list_entries(EntryKind::Profit),
                client.list_entries(EntryKind::Expense)
            )
            .map(|(profits, expenses)| merge_history(profits, expenses));
            ApiEvent::Overview { generation, result }
        });
    }

    /// Categories offered by an entry form, limited to one type
    ///
    /// Not deduplicated: results are matched to the open form by type.
    pub fn load_form_categories(&mut self, category_type: CategoryType) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.list_categories().await.map(|categories| {
                categories
                    .into_iter()
                    .filter(|c| c.kind == category_type)
                    .collect()
            });
            ApiEvent::FormCategories {
                category_type,
                result,
            }
        })
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    fn mutate<F>(&mut self, change: DataChange, success_message: String, request: F) -> bool
    where
        F: Future<Output = ApiResult<()>> + Send + 'static,
    {
        self.submit(RequestKind::Mutation, async move {
            let result = request.await;
            if let Err(e) = &result {
                warn!(?change, error = %e, "Mutation failed");
            }
            ApiEvent::Mutation {
                change,
                success_message,
                result,
            }
        })
    }

    pub fn create_category(&mut self, request: CategoryRequest) -> bool {
        let client = self.client.clone();
        let message = format!("Category \"{}\" created.", request.name);
        self.mutate(DataChange::CategoryCreated, message, async move {
            client.create_category(&request).await.map(|_| ())
        })
    }

    pub fn update_category(&mut self, id: i64, request: CategoryRequest) -> bool {
        let client = self.client.clone();
        let message = format!("Category \"{}\" updated.", request.name);
        self.mutate(DataChange::CategoryUpdated, message, async move {
            client.update_category(id, &request).await.map(|_| ())
        })
    }

    pub fn delete_category(&mut self, id: i64) -> bool {
        let client = self.client.clone();
        self.mutate(
            DataChange::CategoryDeleted,
            "Category deleted.".to_string(),
            async move { client.delete_category(id).await },
        )
    }

    pub fn create_entry(&mut self, kind: EntryKind, request: EntryRequest) -> bool {
        let client = self.client.clone();
        let message = format!("{} \"{}\" added.", kind.label(), request.description);
        self.mutate(DataChange::EntryCreated, message, async move {
            client.create_entry(kind, &request).await.map(|_| ())
        })
    }

    pub fn update_entry(&mut self, kind: EntryKind, id: i64, request: EntryRequest) -> bool {
        let client = self.client.clone();
        let message = format!("{} \"{}\" updated.", kind.label(), request.description);
        self.mutate(DataChange::EntryUpdated, message, async move {
            client.update_entry(kind, id, &request).await.map(|_| ())
        })
    }

    pub fn delete_entry(&mut self, kind: EntryKind, id: i64) -> bool {
        let client = self.client.clone();
        self.mutate(
            DataChange::EntryDeleted,
            format!("{} deleted.", kind.label()),
            async move { client.delete_entry(kind, id).await },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TokenStore;
    use std::time::{Duration, Instant};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Server that answers every connection with the same body after a delay
    async fn canned_server(body: &'static str, delay: Duration) -> String {
        canned_status_server("200 OK", body, delay).await
    }

    async fn canned_status_server(
        status_line: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{}", addr)
    }

    fn dispatcher_for(base_url: &str, dir: &tempfile::TempDir) -> Dispatcher {
        let tokens = TokenStore::open(dir.path().join("token")).unwrap();
        tokens.save("t").unwrap();
        let client = ApiClient::new(base_url, Duration::from_secs(5), tokens, || {}).unwrap();
        Dispatcher::new(Handle::current(), client)
    }

    async fn wait_for_events(dispatcher: &mut Dispatcher, count: usize) -> Vec<ApiEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while events.len() < count && Instant::now() < deadline {
            events.extend(dispatcher.poll());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        events
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_duplicate_mutation_is_refused() {
        let base = canned_server("{}", Duration::from_millis(200)).await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        assert!(dispatcher.delete_category(1));
        assert!(dispatcher.is_in_flight(RequestKind::Mutation));
        assert!(!dispatcher.delete_category(1));

        let events = wait_for_events(&mut dispatcher, 1).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            ApiEvent::Mutation {
                change: DataChange::CategoryDeleted,
                result: Ok(()),
                ..
            }
        ));
        assert!(!dispatcher.is_in_flight(RequestKind::Mutation));
        assert!(dispatcher.delete_category(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_summary_refresh_during_fetch_is_queued() {
        let base = canned_server(
            r#"{"totalProfits":1,"totalExpenses":0,"netWorth":1}"#,
            Duration::from_millis(100),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        dispatcher.fetch_summary();
        dispatcher.fetch_summary();
        assert!(dispatcher.summary_stale);

        // First result lands and immediately starts the queued refresh
        let events = wait_for_events(&mut dispatcher, 1).await;
        assert!(matches!(events[0], ApiEvent::Summary(Ok(_))));
        assert!(dispatcher.is_in_flight(RequestKind::Summary));
        assert!(!dispatcher.summary_stale);

        let events = wait_for_events(&mut dispatcher, 1).await;
        assert!(matches!(events[0], ApiEvent::Summary(Ok(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_missing_category_loads_as_missing() {
        let base = canned_server(r#"[{"id":1,"name":"Salary","type":"PROFIT"}]"#, Duration::ZERO).await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        dispatcher.load_category_panel(7, 42);
        let events = wait_for_events(&mut dispatcher, 1).await;
        match &events[0] {
            ApiEvent::CategoryPanel {
                generation,
                result: Ok(None),
            } => assert_eq!(*generation, 7),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_rejected_panel_load_reports_auth_failure() {
        let base = canned_status_server("401 Unauthorized", "", Duration::ZERO).await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        dispatcher.load_category_panel(1, 2);
        dispatcher.load_overview(1);
        let events = wait_for_events(&mut dispatcher, 2).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(ApiEvent::is_auth_failure));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_results_from_ended_session_are_dropped() {
        let base = canned_server(
            r#"{"totalProfits":1,"totalExpenses":0,"netWorth":1}"#,
            Duration::from_millis(400),
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        dispatcher.fetch_summary();
        dispatcher.reset();
        tokio::time::sleep(Duration::from_millis(200)).await;
        dispatcher.fetch_summary();

        // The old fetch lands first; it neither surfaces nor ends the new one
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(dispatcher.poll().is_empty());
        assert!(dispatcher.is_in_flight(RequestKind::Summary));

        let events = wait_for_events(&mut dispatcher, 1).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ApiEvent::Summary(Ok(_))));
        assert!(!dispatcher.is_in_flight(RequestKind::Summary));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_form_categories_are_filtered_by_type() {
        let base = canned_server(
            r#"[{"id":1,"name":"Salary","type":"PROFIT"},{"id":2,"name":"Rent","type":"EXPENSE"}]"#,
            Duration::ZERO,
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let mut dispatcher = dispatcher_for(&base, &dir);

        dispatcher.load_form_categories(CategoryType::Expense);
        let events = wait_for_events(&mut dispatcher, 1).await;
        match &events[0] {
            ApiEvent::FormCategories { result: Ok(categories), .. } => {
                assert_eq!(categories.len(), 1);
                assert_eq!(categories[0].name, "Rent");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_auth_failure_detection() {
        let event = ApiEvent::Summary(Err(ApiError::AuthFailed));
        assert!(event.is_auth_failure());
        let event = ApiEvent::Summary(Err(ApiError::MissingToken));
        assert!(event.is_auth_failure());
        let event = ApiEvent::Mutation {
            change: DataChange::EntryCreated,
            success_message: String::new(),
            result: Err(ApiError::Status {
                status: reqwest::StatusCode::BAD_REQUEST,
                message: "bad".to_string(),
            }),
        };
        assert!(!event.is_auth_failure());
    }
}
