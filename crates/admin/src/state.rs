//! Application assembly.
//!
//! Wires config, token store, session, HTTP client, auth context and
//! navigation together and hands out page views.

use std::sync::Arc;

use tokio::task::JoinHandle;

use storekeep_core::RecordId;

use crate::api::{AdminApi, Resource};
use crate::auth::AuthContext;
use crate::config::AdminConfig;
use crate::error::AppError;
use crate::guard::{GuardDecision, RouteGuard};
use crate::http::ApiClient;
use crate::nav::{NavigationPolicy, Navigator};
use crate::notify::Notifier;
use crate::session::{FileTokenStore, SessionStore, TokenStore};
use crate::views::{
    BlogForm, DashboardView, DetailView, ListView, LoginView, RecordForm, SettingsView,
    ViewContext,
};

/// The admin client, fully wired.
///
/// Cheap to clone; clones share one session, one client and one auth state.
#[derive(Clone)]
pub struct AdminApp {
    inner: Arc<AdminAppInner>,
}

struct AdminAppInner {
    config: AdminConfig,
    api: AdminApi,
    auth: AuthContext,
    navigation: NavigationPolicy,
    session_watch: Option<JoinHandle<()>>,
}

impl Drop for AdminAppInner {
    fn drop(&mut self) {
        if let Some(watch) = self.session_watch.take() {
            watch.abort();
        }
    }
}

impl std::fmt::Debug for AdminApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminApp")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("auth", &self.inner.auth)
            .finish_non_exhaustive()
    }
}

impl AdminApp {
    /// Assemble the client from its collaborators.
    ///
    /// When built inside a tokio runtime, the auth context follows token
    /// clears made by the HTTP client, so a 401 mid-session drops it to
    /// `Anonymous`. The redirect itself stays with the navigation policy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn new(
        config: AdminConfig,
        tokens: impl TokenStore + 'static,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let session = SessionStore::new(tokens);
        let client = ApiClient::new(&config, session, notifier)?;
        let auth = AuthContext::new(client.clone());
        let session_watch = tokio::runtime::Handle::try_current()
            .is_ok()
            .then(|| auth.watch_session());

        Ok(Self {
            inner: Arc::new(AdminAppInner {
                config,
                api: AdminApi::new(client),
                auth,
                navigation: NavigationPolicy::new(navigator),
                session_watch,
            }),
        })
    }

    /// Assemble the client with the token persisted in the configured
    /// session file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn with_session_file(
        config: AdminConfig,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let tokens = FileTokenStore::new(config.session_file.clone());
        Self::new(config, tokens, notifier, navigator)
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &AdminApi {
        &self.inner.api
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        self.inner.api.client()
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.client().session()
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationPolicy {
        &self.inner.navigation
    }

    /// Decide what navigating to `path` shows right now.
    #[must_use]
    pub fn guard(&self, path: &str) -> GuardDecision {
        RouteGuard::resolve(path, &self.inner.auth.state())
    }

    /// Navigate to `path` through the guard, following redirects.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let decision = self.guard(path);
        match &decision {
            GuardDecision::Render(route) | GuardDecision::Redirect(route) => {
                self.inner.navigation.go(route);
            }
            GuardDecision::Loading | GuardDecision::NotFound => {}
        }
        decision
    }

    // =========================================================================
    // Views
    // =========================================================================

    #[must_use]
    pub fn context(&self) -> ViewContext {
        ViewContext::new(self.inner.api.clone(), self.inner.navigation.clone())
    }

    #[must_use]
    pub fn list(&self, resource: Resource) -> ListView {
        ListView::new(self.context(), resource)
    }

    #[must_use]
    pub fn detail(&self, resource: Resource, id: RecordId) -> DetailView {
        DetailView::new(self.context(), resource, id)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(self.context())
    }

    #[must_use]
    pub fn settings(&self) -> SettingsView {
        SettingsView::new(self.context())
    }

    #[must_use]
    pub fn login(&self) -> LoginView {
        LoginView::new(self.context(), self.inner.auth.clone())
    }

    #[must_use]
    pub fn record_form(&self, resource: Resource) -> RecordForm {
        RecordForm::new(resource)
    }

    #[must_use]
    pub fn blog_form(&self) -> BlogForm {
        BlogForm::new()
    }
}
