//! Session token storage.
//!
//! The token is the only process-wide mutable state of the client. It has
//! exactly two writers:
//! - the auth context (login stores it, logout clears it)
//! - the HTTP client (clears it when the backend answers 401)
//!
//! Every outgoing request reads it. [`SessionStore`] is the owned, injectable
//! handle to that state: tests plug in a [`MemoryTokenStore`], the CLI a
//! [`FileTokenStore`]. Writers publish a [`TokenPresence`] change so readers
//! such as the auth context can follow a clear made elsewhere.

mod error;
mod store;

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::debug;

pub use error::SessionError;
pub use store::{FileTokenStore, MemoryTokenStore, TOKEN_KEY, TokenStore};

/// Whether a token is currently stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPresence {
    Present,
    Absent,
}

/// Shared handle to the persisted session token.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    backend: Box<dyn TokenStore>,
    changes: watch::Sender<TokenPresence>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("presence", &*self.inner.changes.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Wrap a storage backend.
    ///
    /// The initial presence is read from the backend; an unreadable backend
    /// starts out as [`TokenPresence::Absent`].
    #[must_use]
    pub fn new(backend: impl TokenStore + 'static) -> Self {
        let presence = match backend.load() {
            Ok(Some(_)) => TokenPresence::Present,
            _ => TokenPresence::Absent,
        };
        let (changes, _) = watch::channel(presence);

        Self {
            inner: Arc::new(SessionStoreInner {
                backend: Box::new(backend),
                changes,
            }),
        }
    }

    /// Session store that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Read the current token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn token(&self) -> Result<Option<SecretString>, SessionError> {
        self.inner.backend.load()
    }

    /// Whether a token is stored. Unreadable storage counts as no token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Persist a new token and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn store(&self, token: &SecretString) -> Result<(), SessionError> {
        self.inner.backend.save(token)?;
        self.inner.changes.send_replace(TokenPresence::Present);
        debug!("session token stored");
        Ok(())
    }

    /// Remove the token and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.inner.backend.clear()?;
        self.inner.changes.send_replace(TokenPresence::Absent);
        debug!("session token cleared");
        Ok(())
    }

    /// Subscribe to token presence changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TokenPresence> {
        self.inner.changes.subscribe()
    }
}
