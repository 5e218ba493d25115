//! Non-blocking user notifications ("toasts").
//!
//! The HTTP client reports every failure exactly once through a [`Notifier`];
//! views report their successes the same way. What a notification looks like
//! is up to the renderer: [`ToastQueue`] buffers them for a UI or a test to
//! drain, [`TracingNotifier`] writes them to the log.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

/// Shown after an authenticated request is answered with 401.
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";

/// Shown for failures that carry no message of their own.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Buffers notifications until someone drains them.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    queue: Arc<Mutex<VecDeque<Notification>>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notification, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notification> {
        self.queue
            .lock()
            .map(|mut q| q.drain(..).collect())
            .unwrap_or_default()
    }

    /// Messages of pending notifications, without draining them.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.queue
            .lock()
            .map(|q| q.iter().map(|n| n.message.clone()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        if let Ok(mut q) = self.queue.lock() {
            q.push_back(notification);
        }
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success | Level::Info => {
                tracing::info!(message = %notification.message, "notification");
            }
            Level::Error => tracing::warn!(message = %notification.message, "notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = ToastQueue::new();
        queue.notify(Notification::success("saved"));
        queue.notify(Notification::error("boom"));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, Level::Success);
        assert_eq!(drained[1].message, "boom");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let queue = ToastQueue::new();
        let handle: Arc<dyn Notifier> = Arc::new(queue.clone());
        handle.notify(Notification::info("hello"));
        assert_eq!(queue.messages(), vec!["hello".to_string()]);
    }
}
