//! Page view controllers.
//!
//! Each view holds the state a renderer draws (records, loading flags, the
//! record open in a modal, error text) and exposes the user actions of its
//! page. Views never notify failures themselves: the HTTP client already did.
//! They record the failure in their `error` field and send session-ending
//! failures through the [`NavigationPolicy`].

mod dashboard;
mod detail;
mod form;
mod list;
mod login;
mod settings;

pub use dashboard::{DASHBOARD_FAILURE, DashboardView};
pub use detail::DetailView;
pub use form::{BlogForm, RecordForm};
pub use list::ListView;
pub use login::LoginView;
pub use settings::SettingsView;

use std::sync::Arc;

use thiserror::Error;

use crate::api::AdminApi;
use crate::http::ApiError;
use crate::nav::{EndsSession, NavigationPolicy};
use crate::notify::{Notification, Notifier};

/// Errors returned by view actions.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Required form fields are blank. Nothing was sent.
    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The record is not in the view or does not exist on the backend.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend call failed. Already notified by the client.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ViewError {
    /// Whether the backend ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }
}

impl EndsSession for ViewError {
    fn ends_session(&self) -> bool {
        self.is_unauthorized()
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Approve;

impl Confirm for Approve {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl Confirm for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Collaborators every view needs.
#[derive(Clone)]
pub struct ViewContext {
    pub api: AdminApi,
    pub notifier: Arc<dyn Notifier>,
    pub navigation: NavigationPolicy,
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl ViewContext {
    #[must_use]
    pub fn new(api: AdminApi, navigation: NavigationPolicy) -> Self {
        let notifier = Arc::clone(api.client().notifier());
        Self {
            api,
            notifier,
            navigation,
        }
    }

    pub(crate) fn success(&self, message: impl Into<String>) {
        self.notifier.notify(Notification::success(message));
    }

    /// Hand a failed call to the navigation policy and return the text the
    /// view should display.
    pub(crate) fn absorb(&self, error: &ApiError) -> String {
        self.navigation.observe(error);
        error.user_message()
    }
}
