//! Admin authentication context.
//!
//! Tracks who is logged in as a small state machine:
//!
//! ```text
//! Resolving ──▶ Authenticated(admin)
//!     │              │ logout / 401
//!     ▼              ▼
//! Anonymous ◀────────┘
//! ```
//!
//! The stored token is the source of truth. The HTTP client may clear it at
//! any time (a 401 on any request), so [`AuthContext::state`] re-derives the
//! state on every read and [`AuthContext::watch_session`] pushes the change to
//! subscribers as soon as it happens.

mod error;

pub use error::AuthError;

use std::sync::{Arc, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use storekeep_core::Email;

use crate::api::AuthApi;
use crate::http::ApiClient;
use crate::models::{Credentials, CurrentAdmin};
use crate::session::{SessionStore, TokenPresence};

/// Authentication state of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Still finding out whether the stored token is valid.
    #[default]
    Resolving,
    /// Logged in.
    Authenticated(CurrentAdmin),
    /// Not logged in.
    Anonymous,
}

impl AuthState {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub const fn is_resolving(&self) -> bool {
        matches!(self, Self::Resolving)
    }

    /// The logged-in admin, if any.
    #[must_use]
    pub const fn admin(&self) -> Option<&CurrentAdmin> {
        match self {
            Self::Authenticated(admin) => Some(admin),
            _ => None,
        }
    }
}

/// Shared authentication context.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

struct AuthContextInner {
    api: AuthApi,
    session: SessionStore,
    state: watch::Sender<AuthState>,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl AuthContext {
    /// Create a context in the [`AuthState::Resolving`] state.
    ///
    /// Reads and writes the token through the client's session store.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let session = client.session().clone();
        let (state, _) = watch::channel(AuthState::Resolving);

        Self {
            inner: Arc::new(AuthContextInner {
                api: AuthApi::new(client),
                session,
                state,
            }),
        }
    }

    /// Current state, re-derived against the token store.
    ///
    /// An `Authenticated` state whose token has since been cleared reads as
    /// [`AuthState::Anonymous`].
    #[must_use]
    pub fn state(&self) -> AuthState {
        if self.inner.state.borrow().is_authenticated() && !self.inner.session.has_token() {
            self.expire();
        }
        self.inner.state.borrow().clone()
    }

    /// The logged-in admin, if any.
    #[must_use]
    pub fn current_admin(&self) -> Option<CurrentAdmin> {
        self.state().admin().cloned()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Resolve the initial state from the stored token.
    ///
    /// Without a token no request is made. With one, the profile endpoint
    /// decides: success authenticates, any failure clears the token.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> AuthState {
        if !self.inner.session.has_token() {
            debug!("no stored token");
            return self.set(AuthState::Anonymous);
        }

        self.set(AuthState::Resolving);
        match self.inner.api.current_user().await {
            Ok(admin) => {
                info!(admin_id = %admin.id, "session resolved");
                self.set(AuthState::Authenticated(admin))
            }
            Err(e) => {
                warn!(error = %e, "stored token rejected, clearing session");
                self.clear_token();
                self.set(AuthState::Anonymous)
            }
        }
    }

    /// Log in with an email and password.
    ///
    /// On failure neither the state nor the token store changes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` or `AuthError::InvalidEmail`
    /// without contacting the backend when the form is incomplete, and
    /// `AuthError::Api` when the backend rejects the login.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<CurrentAdmin, AuthError> {
        if credentials.email.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("Email is required".to_string()));
        }
        if !credentials.has_password() {
            return Err(AuthError::InvalidCredentials(
                "Password is required".to_string(),
            ));
        }
        let email = Email::parse(&credentials.email)?;

        let response = self.inner.api.login(&email, &credentials.password).await?;
        self.inner.session.store(&response.token)?;

        let admin = match response.user {
            Some(admin) => admin,
            None => match self.inner.api.current_user().await {
                Ok(admin) => admin,
                Err(e) => {
                    self.clear_token();
                    self.set(AuthState::Anonymous);
                    return Err(e.into());
                }
            },
        };

        info!(admin_id = %admin.id, "admin logged in");
        self.set(AuthState::Authenticated(admin.clone()));
        Ok(admin)
    }

    /// Log out.
    ///
    /// The backend is told when a token is held, but the local session ends
    /// whether or not that call succeeds.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.inner.session.has_token()
            && let Err(e) = self.inner.api.logout().await
        {
            warn!(error = %e, "backend logout failed");
        }
        self.clear_token();
        self.set(AuthState::Anonymous);
        info!("admin logged out");
    }

    /// Follow token clears made elsewhere (the HTTP client's 401 path).
    ///
    /// The returned task ends once every handle to the context is dropped.
    pub fn watch_session(&self) -> JoinHandle<()> {
        let weak: Weak<AuthContextInner> = Arc::downgrade(&self.inner);
        let mut presence = self.inner.session.subscribe();

        tokio::spawn(async move {
            while presence.changed().await.is_ok() {
                let current = *presence.borrow_and_update();
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if current == TokenPresence::Absent {
                    Self { inner }.expire();
                }
            }
        })
    }

    fn set(&self, state: AuthState) -> AuthState {
        self.inner.state.send_replace(state.clone());
        state
    }

    /// Drop to `Anonymous` if currently authenticated.
    fn expire(&self) {
        let expired = self.inner.state.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = AuthState::Anonymous;
                true
            } else {
                false
            }
        });
        if expired {
            info!("session ended, admin is now anonymous");
        }
    }

    fn clear_token(&self) {
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "failed to clear session token");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::AdminConfig;
    use crate::notify::ToastQueue;
    use crate::session::MemoryTokenStore;

    fn profile() -> serde_json::Value {
        json!({"_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"})
    }

    fn profile_with_both_ids() -> serde_json::Value {
        json!({"_id": "u1", "id": "u1", "name": "Ada", "email": "ada@example.com", "role": "admin"})
    }

    fn context(server: &MockServer, session: SessionStore) -> (AuthContext, ToastQueue) {
        let toasts = ToastQueue::new();
        let config = AdminConfig::for_api_url(&server.uri()).unwrap();
        let client = ApiClient::new(&config, session, Arc::new(toasts.clone())).unwrap();
        (AuthContext::new(client), toasts)
    }

    #[tokio::test]
    async fn test_starts_resolving() {
        let server = MockServer::start().await;
        let (auth, _) = context(&server, SessionStore::in_memory());
        assert!(auth.state().is_resolving());
    }

    #[tokio::test]
    async fn test_resolve_without_token_skips_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .expect(0)
            .mount(&server)
            .await;

        let (auth, _) = context(&server, SessionStore::in_memory());
        assert_eq!(auth.resolve().await, AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_resolve_with_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .expect(1)
            .mount(&server)
            .await;

        let (auth, _) = context(&server, SessionStore::new(MemoryTokenStore::with_token("t")));
        let state = auth.resolve().await;
        assert_eq!(state.admin().unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_resolve_keeps_token_when_profile_has_both_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_with_both_ids()))
            .expect(1)
            .mount(&server)
            .await;

        let session = SessionStore::new(MemoryTokenStore::with_token("t"));
        let (auth, _) = context(&server, session.clone());
        let state = auth.resolve().await;
        assert_eq!(state.admin().unwrap().id.as_str(), "u1");
        assert!(session.has_token());
    }

    #[tokio::test]
    async fn test_login_accepts_profile_with_both_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"token": "t-1", "user": profile_with_both_ids()}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let session = SessionStore::in_memory();
        let (auth, toasts) = context(&server, session.clone());
        let admin = auth
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(admin.id.as_str(), "u1");
        assert!(session.has_token());
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_failure_clears_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let session = SessionStore::new(MemoryTokenStore::with_token("t"));
        let (auth, _) = context(&server, session.clone());
        assert_eq!(auth.resolve().await, AuthState::Anonymous);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_authenticates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"token": "t-1", "user": profile()})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = SessionStore::in_memory();
        let (auth, toasts) = context(&server, session.clone());
        let admin = auth
            .login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap();

        assert_eq!(admin.email.as_str(), "ada@example.com");
        assert!(session.has_token());
        assert!(auth.state().is_authenticated());
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_login_fetches_profile_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(wiremock::matchers::header("authorization", "Bearer t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .expect(1)
            .mount(&server)
            .await;

        let (auth, _) = context(&server, SessionStore::in_memory());
        auth.login(&Credentials::new("ada@example.com", "pw"))
            .await
            .unwrap();
        assert!(auth.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_rejected_login_changes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let session = SessionStore::in_memory();
        let (auth, toasts) = context(&server, session.clone());
        auth.resolve().await;

        let err = auth
            .login(&Credentials::new("ada@example.com", "wrong"))
            .await
            .unwrap_err();

        assert!(!err.is_local());
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(auth.state(), AuthState::Anonymous);
        assert!(!session.has_token());
        assert_eq!(toasts.messages(), vec!["Invalid credentials".to_string()]);
    }

    #[tokio::test]
    async fn test_login_validates_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (auth, toasts) = context(&server, SessionStore::in_memory());
        for creds in [
            Credentials::new("", "pw"),
            Credentials::new("ada@example.com", ""),
            Credentials::new("not-an-email", "pw"),
        ] {
            assert!(auth.login(&creds).await.unwrap_err().is_local());
        }
        assert!(toasts.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let session = SessionStore::new(MemoryTokenStore::with_token("t"));
        let (auth, _) = context(&server, session.clone());
        auth.resolve().await;
        auth.logout().await;

        assert!(!session.has_token());
        assert_eq!(auth.state(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_state_rederives_after_external_clear() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .mount(&server)
            .await;

        let session = SessionStore::new(MemoryTokenStore::with_token("t"));
        let (auth, _) = context(&server, session.clone());
        auth.resolve().await;
        assert!(auth.state().is_authenticated());

        session.clear().unwrap();
        assert_eq!(auth.state(), AuthState::Anonymous);
    }

    #[tokio::test]
    async fn test_watch_session_pushes_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile()))
            .mount(&server)
            .await;

        let session = SessionStore::new(MemoryTokenStore::with_token("t"));
        let (auth, _) = context(&server, session.clone());
        auth.resolve().await;

        let mut states = auth.subscribe();
        states.mark_unchanged();
        let _watcher = auth.watch_session();

        session.clear().unwrap();
        states.changed().await.unwrap();
        assert_eq!(*states.borrow(), AuthState::Anonymous);
    }
}
