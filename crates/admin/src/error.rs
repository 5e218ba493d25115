//! Unified error handling for admin.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::http::ApiError;
use crate::nav::EndsSession;
use crate::session::SessionError;
use crate::views::ViewError;

/// Application-level error type for the admin client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The session token store failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Login or logout failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A page action failed.
    #[error("{0}")]
    View(#[from] ViewError),
}

impl AppError {
    /// Whether the backend ended the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        match self {
            Self::Api(e) => e.is_unauthorized(),
            Self::Auth(e) => e.is_unauthorized(),
            Self::View(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Whether this is worth reporting to error tracking.
    ///
    /// User mistakes and backend rejections are not.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Session(_)
                | Self::Api(ApiError::Decode(_) | ApiError::Encode(_) | ApiError::Session(_))
        )
    }
}

impl EndsSession for AppError {
    fn ends_session(&self) -> bool {
        self.is_unauthorized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_is_seen_through_wrappers() {
        assert!(AppError::from(ApiError::Unauthorized).is_unauthorized());
        assert!(AppError::from(AuthError::Api(ApiError::Unauthorized)).is_unauthorized());
        assert!(AppError::from(ViewError::Api(ApiError::Unauthorized)).is_unauthorized());
        assert!(
            !AppError::from(ConfigError::MissingEnvVar("ADMIN_API_URL".to_string()))
                .is_unauthorized()
        );
    }

    #[test]
    fn test_validation_display() {
        let err = AppError::from(ViewError::Validation(vec![
            "code".to_string(),
            "value".to_string(),
        ]));
        assert_eq!(err.to_string(), "missing required fields: code, value");
        assert!(!err.is_internal());
    }
}
