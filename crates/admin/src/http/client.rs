//! Admin REST API client.
//!
//! Wraps `reqwest` with the two cross-cutting behaviours every backend call
//! needs: bearer-token injection from the [`SessionStore`] and uniform failure
//! reporting through the [`Notifier`].

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::AdminConfig;
use crate::notify::{GENERIC_FAILURE, Notification, Notifier, SESSION_EXPIRED};
use crate::session::SessionStore;

use super::error::{ApiError, ErrorBody};

/// Fallback shown when the login endpoint rejects credentials without a message.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    /// Attach the stored token; a 401 ends the session.
    Session,
    /// Send no token; a 401 means the submitted credentials were wrong.
    Credentials,
}

/// Admin REST API client.
///
/// Cheap to clone; all clones share one connection pool, one session store
/// and one notifier. No retries, no backoff: every failure is notified once
/// and returned.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the underlying HTTP client cannot be
    /// built (e.g. no TLS backend available).
    pub fn new(
        config: &AdminConfig,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                session,
                notifier,
            }),
        })
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The session store this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The notifier failures are reported to.
    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a path and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None, AuthMode::Session).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.send(Method::POST, path, Some(body), AuthMode::Session)
            .await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.send(Method::PUT, path, Some(body), AuthMode::Session)
            .await
    }

    /// `PATCH` a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.send(Method::PATCH, path, Some(body), AuthMode::Session)
            .await
    }

    /// `DELETE` a path.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, None, AuthMode::Session)
            .await
    }

    /// `POST` credentials to an authentication endpoint.
    ///
    /// No bearer token is attached and a 401 does not touch the stored
    /// session: it is reported as rejected credentials instead.
    ///
    /// # Errors
    ///
    /// See [`ApiError`]; the failure has already been notified.
    pub async fn post_credentials<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.send(Method::POST, path, Some(body), AuthMode::Credentials)
            .await
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        auth: AuthMode,
    ) -> Result<T, ApiError> {
        let url = self.url(path).map_err(|e| self.fail(e))?;

        let mut request = self.inner.client.request(method, url);
        if auth == AuthMode::Session
            && let Some(token) = self.inner.session.token().map_err(|e| self.fail(e.into()))?
        {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.fail(ApiError::Transport(e)))?;
        let status = response.status();
        debug!(status = status.as_u16(), "backend responded");

        if status == StatusCode::UNAUTHORIZED && auth == AuthMode::Session {
            warn!("backend rejected session token, clearing session");
            if let Err(e) = self.inner.session.clear() {
                warn!(error = %e, "failed to clear session token");
            }
            return Err(self.fail(ApiError::Unauthorized));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.fail(ApiError::Transport(e)))?;

        if !status.is_success() {
            let mut message = ErrorBody::message_from(&bytes);
            if status == StatusCode::UNAUTHORIZED {
                message = message.or_else(|| Some(INVALID_CREDENTIALS.to_string()));
            }
            return Err(self.fail(ApiError::Status { status, message }));
        }

        let decoded = if bytes.is_empty() {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&bytes)
        };
        decoded.map_err(|e| self.fail(ApiError::Decode(e.to_string())))
    }

    /// Resolve a path against the base URL, keeping the base path.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidPath(format!("{path}: {e}")))
    }

    fn encode<B: Serialize + ?Sized>(&self, body: &B) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(body).map_err(|e| self.fail(ApiError::Encode(e.to_string())))
    }

    /// Report a failure to the user exactly once and hand it back.
    fn fail(&self, error: ApiError) -> ApiError {
        let message = match &error {
            ApiError::Unauthorized => SESSION_EXPIRED.to_string(),
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        };
        warn!(error = %error, "backend request failed");
        self.inner.notifier.notify(Notification::error(message));
        error
    }
}
