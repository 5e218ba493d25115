//! Command implementations.

pub mod dashboard;
pub mod records;
pub mod route;
pub mod session;
pub mod settings;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use storekeep_admin::auth::AuthError;
use storekeep_admin::config::{AdminConfig, ConfigError};
use storekeep_admin::guard::{GuardDecision, Route};
use storekeep_admin::nav::HistoryNavigator;
use storekeep_admin::notify::{Level, ToastQueue};
use storekeep_admin::views::ViewError;
use storekeep_admin::{AdminApp, AppError};

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No valid session.
    #[error("Not logged in. Run `sk login -e <email>` first.")]
    NotLoggedIn,

    /// The command's arguments were unusable.
    #[error("Invalid input: {0}")]
    Invalid(String),

    /// Reading from or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    App(#[from] AppError),
}

impl CliError {
    /// Whether this is worth reporting to error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::App(e) => e.is_internal(),
            _ => false,
        }
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        if e.is_unauthorized() {
            return Self::NotLoggedIn;
        }
        Self::App(e.into())
    }
}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        Self::App(e.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::App(e.into())
    }
}

/// The wired admin app plus the terminal's view of notifications and
/// navigation.
pub struct Console {
    pub app: AdminApp,
    toasts: ToastQueue,
    history: HistoryNavigator,
}

impl Console {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: AdminConfig) -> Result<Self, CliError> {
        let toasts = ToastQueue::new();
        let history = HistoryNavigator::new();
        let app = AdminApp::with_session_file(
            config,
            Arc::new(toasts.clone()),
            Arc::new(history.clone()),
        )?;

        Ok(Self {
            app,
            toasts,
            history,
        })
    }

    /// Resolve the session and pass `route` through the guard.
    ///
    /// # Errors
    ///
    /// Returns `CliError::NotLoggedIn` when the guard redirects to login.
    pub async fn enter(&self, route: &Route) -> Result<(), CliError> {
        self.app.auth().resolve().await;
        match self.app.navigate(&route.path()) {
            GuardDecision::Render(_) => Ok(()),
            GuardDecision::Redirect(Route::Login) => Err(CliError::NotLoggedIn),
            other => Err(CliError::Invalid(format!("cannot open {route}: {other:?}"))),
        }
    }

    /// Whether anything sent the user back to the login page.
    #[must_use]
    pub fn redirected_to_login(&self) -> bool {
        self.history.history().contains(&Route::Login)
    }

    /// Print pending notifications to stderr.
    #[allow(clippy::print_stderr)]
    pub fn flush(&self) {
        for toast in self.toasts.drain() {
            let tag = match toast.level {
                Level::Success => "ok",
                Level::Info => "info",
                Level::Error => "error",
            };
            eprintln!("[{tag}] {}", toast.message);
        }
        if self.redirected_to_login() {
            eprintln!("Session ended. Run `sk login -e <email>` to sign in again.");
        }
    }
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Invalid(format!("unprintable value: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Ask a yes/no question on stderr and read the answer from stdin.
#[allow(clippy::print_stderr)]
pub fn ask(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read one line from stdin after printing `prompt` on stderr.
///
/// # Errors
///
/// Returns an error if the terminal cannot be read.
#[allow(clippy::print_stderr)]
pub fn read_line(prompt: &str) -> Result<String, CliError> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse a value as JSON, falling back to a plain string.
#[must_use]
pub fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_value_prefers_json() {
        assert_eq!(parse_value("12"), json!(12));
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("1-2 days"), json!("1-2 days"));
    }
}
