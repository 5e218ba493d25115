//! Session storage errors.

use thiserror::Error;

/// Errors that can occur while reading or writing the persisted token.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but does not hold a session.
    #[error("session storage is corrupt: {0}")]
    Corrupt(String),

    /// A writer panicked while holding the token lock.
    #[error("session storage lock poisoned")]
    Poisoned,
}
