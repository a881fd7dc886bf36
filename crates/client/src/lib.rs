//! HTTP facade for the YouMatter API.
//!
//! A single configured [`ApiClient`] maps the client's logical operations
//! onto the remote endpoints. Responses pass through unchanged apart from
//! boundary normalization in `youmatter-types`; error bodies surface the
//! server-provided `error`/`message` text when present.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use youmatter_common::{AppError, AppResult, Config, TokenStore};

pub mod auth;
pub mod complaints;
pub mod students;
pub mod users;

pub use auth::{
    Acknowledgement, LoginOutcome, PasswordResetRequired, SessionResponse, TwoFactorChallenge,
    VerifyOutcome, VerifyTwoFactorRequest,
};
pub use complaints::ComplaintQuery;
pub use students::{
    InviteAdminRequest, InviteStudentRequest, InvitedAdmin, InvitedStudent, UpdateStudentRequest,
};
pub use users::{CreateUserRequest, UpdateUserRequest, encode_avatar_image};

/// Error body shape used by the API: `{"error": ..., "message": ...}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    retry_after: Option<u64>,
}

impl ErrorBody {
    fn text(&self, status: StatusCode) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| format!("Request failed with status {status}"))
    }
}

/// Configured HTTP client for the YouMatter API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    token_store: Option<TokenStore>,
    google_client_id: Option<String>,
}

impl ApiClient {
    /// Create a client for the given API base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Self::build(base_url.into(), Duration::from_secs(30), None, None)
    }

    /// Create a client from application configuration.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::build(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
            Some(TokenStore::new(&config.session.token_path)),
            config.auth.google_client_id.clone(),
        )
    }

    fn build(
        base_url: String,
        timeout: Duration,
        token_store: Option<TokenStore>,
        google_client_id: Option<String>,
    ) -> AppResult<Self> {
        url::Url::parse(&base_url)
            .map_err(|e| AppError::Config(format!("Invalid API base URL {base_url:?}: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
            token_store,
            google_client_id,
        })
    }

    /// The configured API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a possibly relative attachment path against the API origin.
    #[must_use]
    pub fn to_absolute_url(&self, path: &str) -> String {
        youmatter_common::to_absolute_url(&self.base_url, path)
    }

    /// Install or remove the bearer token used on subsequent requests.
    pub fn set_auth_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    /// The bearer token currently installed, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|slot| slot.clone())
    }

    /// Load a persisted session token into the client, returning it.
    pub async fn restore_session(&self) -> Option<String> {
        let store = self.token_store.as_ref()?;
        let token = store.load().await?;
        self.set_auth_token(Some(token.clone()));
        Some(token)
    }

    /// Clear the in-memory and persisted session.
    pub async fn logout(&self) {
        self.set_auth_token(None);
        if let Some(store) = &self.token_store
            && let Err(e) = store.clear().await
        {
            tracing::warn!(error = %e, "Failed to clear persisted session");
        }
    }

    pub(crate) async fn remember_token(&self, token: &str) {
        self.set_auth_token(Some(token.to_string()));
        if let Some(store) = &self.token_store
            && let Err(e) = store.save(token).await
        {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
    }

    pub(crate) fn google_client_id(&self) -> Option<&str> {
        self.google_client_id.as_deref()
    }

    // === Request plumbing ===

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.auth_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let builder = self.authorized(self.http.get(self.endpoint(path)));
        self.send(path, builder).await
    }

    pub(crate) async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let builder = self.authorized(self.http.get(self.endpoint(path)).query(query));
        self.send(path, builder).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let builder = self.authorized(self.http.post(self.endpoint(path)).json(body));
        self.send(path, builder).await
    }

    pub(crate) async fn patch_json<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let builder = self.authorized(self.http.patch(self.endpoint(path)).json(body));
        self.send(path, builder).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let builder = self.authorized(self.http.delete(self.endpoint(path)));
        self.send(path, builder).await
    }

    async fn send<T: DeserializeOwned>(&self, path: &str, builder: RequestBuilder) -> AppResult<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "Request failed to reach the API");
            AppError::Transport(e.to_string())
        })?;
        self.handle_response(path, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: Response,
    ) -> AppResult<T> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                tracing::warn!(path, error = %e, "Failed to decode API response");
                AppError::Transport(format!("Invalid response body: {e}"))
            });
        }

        let retry_after_header = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let message = body.text(status);
        tracing::debug!(path, status = status.as_u16(), message = %message, "API error response");

        match status {
            StatusCode::UNAUTHORIZED => {
                // Session expired; drop the stored token so the next
                // navigation lands on login.
                self.logout().await;
                Err(AppError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(AppError::NotFound(message)),
            StatusCode::TOO_MANY_REQUESTS => Err(AppError::RateLimited {
                message,
                retry_after: body.retry_after.or(retry_after_header),
            }),
            StatusCode::CONFLICT if body.error.as_deref() == Some("duplicate_submission") => {
                Err(AppError::DuplicateSubmission(message))
            }
            _ => Err(AppError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = ApiClient::new("http://localhost:5001/api/").unwrap();
        assert_eq!(
            client.endpoint("/complaints"),
            "http://localhost:5001/api/complaints"
        );
    }

    #[test]
    fn test_to_absolute_url() {
        let client = ApiClient::new("http://localhost:5001/api").unwrap();
        assert_eq!(client.to_absolute_url("https://x/y"), "https://x/y");
        assert_eq!(client.to_absolute_url("/foo"), "http://localhost:5001/foo");
    }

    #[test]
    fn test_set_auth_token_installs_and_removes() {
        let client = ApiClient::new("http://localhost:5001/api").unwrap();
        assert_eq!(client.auth_token(), None);

        client.set_auth_token(Some("tok".to_string()));
        assert_eq!(client.auth_token(), Some("tok".to_string()));

        client.set_auth_token(None);
        assert_eq!(client.auth_token(), None);
    }

    #[test]
    fn test_error_body_message_preference() {
        let body = ErrorBody {
            error: Some("rate_limited".to_string()),
            message: Some("Too many complaints submitted.".to_string()),
            retry_after: Some(30),
        };
        assert_eq!(
            body.text(StatusCode::TOO_MANY_REQUESTS),
            "Too many complaints submitted."
        );

        let body = ErrorBody {
            error: Some("Complaint not found".to_string()),
            message: None,
            retry_after: None,
        };
        assert_eq!(body.text(StatusCode::NOT_FOUND), "Complaint not found");
    }
}
