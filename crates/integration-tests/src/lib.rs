//! Integration tests for Storekeep.
//!
//! Every scenario runs the fully wired [`AdminApp`] against a `wiremock`
//! backend, so no external services are needed:
//!
//! ```bash
//! cargo test -p storekeep-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storekeep_admin::AdminApp;
use storekeep_admin::config::AdminConfig;
use storekeep_admin::nav::HistoryNavigator;
use storekeep_admin::notify::ToastQueue;
use storekeep_admin::session::{MemoryTokenStore, TokenStore};

/// Email accepted by [`TestContext::mount_login`].
pub const ADMIN_EMAIL: &str = "admin@shop.test";

/// Password accepted by [`TestContext::mount_login`].
pub const ADMIN_PASSWORD: &str = "correct horse";

/// Token handed out by [`TestContext::mount_login`].
pub const ADMIN_TOKEN: &str = "token-123";

/// A mocked backend and an admin app pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub app: AdminApp,
    pub toasts: ToastQueue,
    pub history: HistoryNavigator,
}

impl TestContext {
    /// Fresh backend, no stored session.
    ///
    /// # Panics
    ///
    /// Panics if the app cannot be assembled.
    pub async fn new() -> Self {
        Self::with_tokens(MemoryTokenStore::new()).await
    }

    /// Fresh backend with `tokens` as the session storage.
    ///
    /// # Panics
    ///
    /// Panics if the app cannot be assembled.
    #[allow(clippy::unwrap_used)]
    pub async fn with_tokens(tokens: impl TokenStore + 'static) -> Self {
        let server = MockServer::start().await;
        let toasts = ToastQueue::new();
        let history = HistoryNavigator::new();
        let config = AdminConfig::for_api_url(&format!("{}/api", server.uri())).unwrap();
        let app = AdminApp::new(
            config,
            tokens,
            Arc::new(toasts.clone()),
            Arc::new(history.clone()),
        )
        .unwrap();

        Self {
            server,
            app,
            toasts,
            history,
        }
    }

    /// Profile returned by `/auth/me`.
    #[must_use]
    pub fn profile() -> Value {
        json!({"_id": "admin-1", "name": "Store Admin", "email": ADMIN_EMAIL, "role": "admin"})
    }

    /// `/auth/login` accepting [`ADMIN_EMAIL`] / [`ADMIN_PASSWORD`] and
    /// rejecting anything else with 401, plus `/auth/me` for the issued token.
    pub async fn mount_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(wiremock::matchers::body_json(
                json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"token": ADMIN_TOKEN, "user": Self::profile()})),
            )
            .with_priority(1)
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
            )
            .with_priority(2)
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(wiremock::matchers::header(
                "authorization",
                format!("Bearer {ADMIN_TOKEN}").as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::profile()))
            .mount(&self.server)
            .await;
    }

    /// `GET /api/{resource}` answering with `records`.
    pub async fn mount_list(&self, resource: &str, records: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/api/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(records))
            .mount(&self.server)
            .await;
    }

    /// Messages of every notification so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.toasts.messages()
    }
}
