//! Authentication error types.

use thiserror::Error;

use crate::http::ApiError;
use crate::session::SessionError;

/// Errors that can occur while logging in or out.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required login field is missing.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The email address is not well formed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] storekeep_core::EmailError),

    /// The backend call failed. Already notified by the client.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The token could not be persisted.
    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Whether the failure was rejected before reaching the backend.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_) | Self::InvalidEmail(_))
    }

    /// Whether the backend ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }

    /// Text to show on the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::InvalidCredentials(message) => message.clone(),
            Self::Session(_) => crate::notify::GENERIC_FAILURE.to_string(),
        }
    }
}

impl crate::nav::EndsSession for AuthError {
    fn ends_session(&self) -> bool {
        self.is_unauthorized()
    }
}
