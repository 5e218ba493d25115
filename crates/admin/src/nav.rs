//! Navigation.
//!
//! The HTTP client never navigates. Callers route their results through a
//! [`NavigationPolicy`], which sends the user to the login page when a
//! request ended the session.

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::guard::Route;
use crate::http::ApiError;

/// Something that can change the current location.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}

/// Records every navigation; the last entry is the current location.
#[derive(Debug, Clone, Default)]
pub struct HistoryNavigator {
    history: Arc<Mutex<Vec<Route>>>,
}

impl HistoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.history.lock().ok().and_then(|h| h.last().cloned())
    }

    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: &Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(route.clone());
        }
    }
}

/// Turns session-ending errors into a redirect to the login page.
#[derive(Clone)]
pub struct NavigationPolicy {
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for NavigationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationPolicy").finish_non_exhaustive()
    }
}

impl NavigationPolicy {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Navigate to `route`.
    pub fn go(&self, route: &Route) {
        self.navigator.navigate(route);
    }

    /// Pass `result` through, redirecting to login once if it is a 401.
    ///
    /// # Errors
    ///
    /// Returns the error it was given.
    pub fn intercept<T, E: EndsSession>(&self, result: Result<T, E>) -> Result<T, E> {
        if let Err(e) = &result {
            self.observe(e);
        }
        result
    }

    /// Redirect to login if `error` ended the session.
    pub fn observe(&self, error: &impl EndsSession) {
        if error.ends_session() {
            info!("session ended, redirecting to login");
            self.navigator.navigate(&Route::Login);
        }
    }
}

/// Errors that know whether the backend ended the session.
pub trait EndsSession {
    fn ends_session(&self) -> bool;
}

impl EndsSession for ApiError {
    fn ends_session(&self) -> bool {
        self.is_unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_unauthorized_redirects_once() {
        let history = HistoryNavigator::new();
        let policy = NavigationPolicy::new(Arc::new(history.clone()));

        let result: Result<(), ApiError> = policy.intercept(Err(ApiError::Unauthorized));
        assert!(result.is_err());
        assert_eq!(history.history(), vec![Route::Login]);
    }

    #[test]
    fn test_other_errors_pass_through() {
        let history = HistoryNavigator::new();
        let policy = NavigationPolicy::new(Arc::new(history.clone()));

        let result: Result<(), ApiError> = policy.intercept(Err(ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: None,
        }));
        assert!(result.is_err());
        assert!(policy.intercept::<_, ApiError>(Ok(1)).is_ok());
        assert!(history.history().is_empty());
    }

    #[test]
    fn test_go_records_history() {
        let history = HistoryNavigator::new();
        let policy = NavigationPolicy::new(Arc::new(history.clone()));
        policy.go(&Route::Orders);
        policy.go(&Route::Dashboard);
        assert_eq!(history.current(), Some(Route::Dashboard));
    }
}
