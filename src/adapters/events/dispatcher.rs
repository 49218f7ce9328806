//! EventDispatcher - background delivery of platform notifications.
//!
//! Request handlers must not wait on the platform, so notifications go
//! through a bounded queue:
//!
//! 1. `QueuedEventSink::notify` enqueues without waiting (`Queued`)
//! 2. **`EventDispatcher` drains the queue into the real sink** ← This module
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `max_attempts` | 3 | Delivery attempts per event |
//! | `retry_backoff` | 500ms | Base delay, multiplied by the attempt number |
//!
//! ## Graceful Shutdown
//!
//! On shutdown the dispatcher stops accepting new work from the channel
//! loop and delivers whatever is already queued before returning.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::domain::events::PlatformEvent;
use crate::ports::{DeliveryStatus, EventSink, NotifyError};

/// Configuration for the EventDispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl DispatcherConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

/// Counters returned when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub delivered: usize,
    pub dropped: usize,
}

/// Creates a bounded queue: the sink side for handlers and the dispatcher
/// that feeds `target`.
pub fn event_queue(
    capacity: usize,
    target: Arc<dyn EventSink>,
    config: DispatcherConfig,
) -> (QueuedEventSink, EventDispatcher) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        QueuedEventSink { tx },
        EventDispatcher { rx, target, config },
    )
}

/// Event sink that enqueues for the dispatcher.
#[derive(Clone)]
pub struct QueuedEventSink {
    tx: mpsc::Sender<PlatformEvent>,
}

#[async_trait]
impl EventSink for QueuedEventSink {
    async fn notify(&self, event: &PlatformEvent) -> Result<DeliveryStatus, NotifyError> {
        self.tx.try_send(event.clone()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => NotifyError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => NotifyError::QueueClosed,
        })?;
        Ok(DeliveryStatus::Queued)
    }
}

/// Background service that delivers queued events with bounded retries.
pub struct EventDispatcher {
    rx: mpsc::Receiver<PlatformEvent>,
    target: Arc<dyn EventSink>,
    config: DispatcherConfig,
}

impl EventDispatcher {
    /// Run until shutdown is signalled or every sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> DispatchStats {
        let mut stats = DispatchStats::default();

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.rx.close();
                        while let Some(event) = self.rx.recv().await {
                            self.record(&mut stats, &event).await;
                        }
                        tracing::info!(?stats, "Event dispatcher stopped");
                        return stats;
                    }
                }

                next = self.rx.recv() => {
                    match next {
                        Some(event) => self.record(&mut stats, &event).await,
                        None => {
                            tracing::info!(?stats, "Event queue closed");
                            return stats;
                        }
                    }
                }
            }
        }
    }

    async fn record(&self, stats: &mut DispatchStats, event: &PlatformEvent) {
        if self.deliver(event).await {
            stats.delivered += 1;
        } else {
            stats.dropped += 1;
        }
    }

    /// Delivers one event, retrying transient failures. Returns true on success.
    pub async fn deliver(&self, event: &PlatformEvent) -> bool {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.target.notify(event).await {
                Ok(status) => {
                    tracing::info!(
                        kind = event.kind(),
                        wix_transaction_id = event.wix_transaction_id(),
                        ?status,
                        attempt,
                        "Platform event delivered"
                    );
                    return true;
                }
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    tracing::debug!(error = %err, attempt, "Platform event delivery failed, retrying");
                    tokio::time::sleep(self.config.retry_backoff * attempt).await;
                }
                Err(err) => {
                    tracing::error!(
                        kind = event.kind(),
                        wix_transaction_id = event.wix_transaction_id(),
                        error = %err,
                        attempt,
                        "Platform event dropped"
                    );
                    return false;
                }
            }
        }
        false
    }
}
