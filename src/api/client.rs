// HTTP client for the finance API
//
// Every authenticated request carries the stored bearer token. A 401/403 on
// an authenticated request runs the auth-failure handler supplied at
// construction time before the error is returned to the caller.

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use super::token::TokenStore;
use super::types::{
    AuthResponse, Category, CategoryRequest, EntryKind, EntryRequest, EntryResponse,
    FinancialSummary, LoginRequest, RegisterRequest,
};

/// Prefix the backend mounts its routes under
const API_PREFIX: &str = "/api";

/// Callback invoked when the server rejects the session
pub type AuthFailureHandler = Arc<dyn Fn() + Send + Sync>;

/// Error payload shape used by the backend
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: TokenStore,
    on_auth_failure: AuthFailureHandler,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token_file", &self.tokens.path())
            .finish()
    }
}

/// Join the base URL and an endpoint, adding the `/api` prefix when missing
///
/// Absolute endpoints are used as-is.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    let base = base_url.trim_end_matches('/');
    if endpoint.starts_with("/api/") {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}{}{}", base, API_PREFIX, endpoint)
    }
}

/// Human-readable message for a failed response
///
/// Prefers the backend's JSON `message`, then the status reason phrase.
pub fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("API request failed with status {}.", status.as_u16()))
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: TokenStore,
        on_auth_failure: impl Fn() + Send + Sync + 'static,
    ) -> ApiResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            on_auth_failure: Arc::new(on_auth_failure),
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Send a request and return the response body, `None` when empty
    async fn send<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        require_auth: bool,
    ) -> ApiResult<Option<String>>
    where
        B: Serialize + ?Sized,
    {
        let url = endpoint_url(&self.base_url, endpoint);
        let mut request = self.http.request(method.clone(), &url);

        if require_auth {
            let token = self.tokens.get().ok_or(ApiError::MissingToken)?;
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "Sending API request");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                if require_auth {
                    warn!(%url, status = status.as_u16(), "Session rejected by server");
                    (self.on_auth_failure)();
                    return Err(ApiError::AuthFailed);
                }
                return Err(ApiError::Status {
                    status,
                    message: "Invalid username or password.".to_string(),
                });
            }
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!(%url, status = status.as_u16(), %message, "API request failed");
            return Err(ApiError::Status { status, message });
        }

        let text = response.text().await?;
        Ok((!text.trim().is_empty()).then_some(text))
    }

    async fn fetch<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
        require_auth: bool,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self
            .send(method, endpoint, body, require_auth)
            .await?
            .unwrap_or_default();
        Ok(serde_json::from_str(&text)?)
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.fetch::<T, ()>(Method::GET, endpoint, None, true).await
    }

    async fn delete(&self, endpoint: &str) -> ApiResult<()> {
        self.send::<()>(Method::DELETE, endpoint, None, true)
            .await
            .map(|_| ())
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.fetch(Method::POST, "/auth/register", Some(request), false)
            .await
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.fetch(Method::POST, "/auth/login", Some(request), false)
            .await
    }

    // ------------------------------------------------------------------
    // Summary
    // ------------------------------------------------------------------

    pub async fn summary(&self) -> ApiResult<FinancialSummary> {
        self.get("/summary").await
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.get("/categories").await
    }

    pub async fn create_category(&self, request: &CategoryRequest) -> ApiResult<Category> {
        self.fetch(Method::POST, "/categories", Some(request), true)
            .await
    }

    pub async fn update_category(&self, id: i64, request: &CategoryRequest) -> ApiResult<Category> {
        self.fetch(Method::PUT, &format!("/categories/{}", id), Some(request), true)
            .await
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.delete(&format!("/categories/{}", id)).await
    }

    // ------------------------------------------------------------------
    // Entries (profits and expenses share one shape)
    // ------------------------------------------------------------------

    pub async fn list_entries(&self, kind: EntryKind) -> ApiResult<Vec<EntryResponse>> {
        self.get(kind.resource()).await
    }

    pub async fn entries_by_category(
        &self,
        kind: EntryKind,
        category_id: i64,
    ) -> ApiResult<Vec<EntryResponse>> {
        self.get(&format!("{}/byCategory/{}", kind.resource(), category_id))
            .await
    }

    pub async fn create_entry(
        &self,
        kind: EntryKind,
        request: &EntryRequest,
    ) -> ApiResult<EntryResponse> {
        self.fetch(Method::POST, kind.resource(), Some(request), true)
            .await
    }

    pub async fn update_entry(
        &self,
        kind: EntryKind,
        id: i64,
        request: &EntryRequest,
    ) -> ApiResult<EntryResponse> {
        self.fetch(
            Method::PUT,
            &format!("{}/{}", kind.resource(), id),
            Some(request),
            true,
        )
        .await
    }

    pub async fn delete_entry(&self, kind: EntryKind, id: i64) -> ApiResult<()> {
        self.delete(&format!("{}/{}", kind.resource(), id)).await
    }
}
