//! HTTP client errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::notify::GENERIC_FAILURE;
use crate::session::SessionError;

/// Errors returned by [`super::ApiClient`].
///
/// By the time a caller sees one of these the client has already notified
/// the user; callers only need to react (stop a spinner, redirect).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the session token. The token has been cleared.
    #[error("unauthorized: session expired")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// Response status.
        status: StatusCode,
        /// Human-readable `message` from the error body, when present.
        message: Option<String>,
    },

    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("invalid request body: {0}")]
    Encode(String),

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The path could not be resolved against the base URL.
    #[error("invalid request path: {0}")]
    InvalidPath(String),

    /// The session token could not be read.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Whether this error terminated the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status of the response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => crate::notify::SESSION_EXPIRED.to_string(),
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Error body shape shared by every backend endpoint.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract a usable message from a raw body. Non-JSON bodies and blank
    /// messages yield `None`.
    pub(crate) fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
