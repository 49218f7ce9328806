//! EventSink port - notifies the platform of transaction and refund outcomes.
//!
//! Notifications are fire-and-continue: a failed notification is logged by
//! the caller and never rolls back a committed ledger write.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::events::PlatformEvent;

/// How far an event got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Accepted by the platform with the given HTTP status.
    Delivered(u16),
    /// Handed to a background dispatcher.
    Queued,
    /// No delivery target is configured; the event was only logged.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("Access token request failed: {0}")]
    TokenUnavailable(String),

    #[error("Event delivery failed: {0}")]
    Transport(String),

    #[error("Platform rejected event with status {0}")]
    Rejected(u16),

    #[error("Event queue is full")]
    QueueFull,

    #[error("Event queue is closed")]
    QueueClosed,
}

impl NotifyError {
    /// Whether redelivering the same event may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::TokenUnavailable(_) | NotifyError::Transport(_) => true,
            NotifyError::Rejected(status) => *status >= 500 || *status == 429 || *status == 401,
            NotifyError::QueueFull | NotifyError::QueueClosed => false,
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn notify(&self, event: &PlatformEvent) -> Result<DeliveryStatus, NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventSink) {}

    #[test]
    fn server_errors_are_retryable() {
        assert!(NotifyError::Rejected(503).is_retryable());
        assert!(NotifyError::Rejected(429).is_retryable());
        assert!(NotifyError::Transport("reset".into()).is_retryable());
    }

    #[test]
    fn client_errors_are_final() {
        assert!(!NotifyError::Rejected(400).is_retryable());
        assert!(!NotifyError::QueueFull.is_retryable());
    }
}
