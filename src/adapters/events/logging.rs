//! Event sink used when no platform credentials are configured.

use async_trait::async_trait;

use crate::domain::events::PlatformEvent;
use crate::ports::{DeliveryStatus, EventSink, NotifyError};

/// Logs each event and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn notify(&self, event: &PlatformEvent) -> Result<DeliveryStatus, NotifyError> {
        let payload = serde_json::to_string(event).unwrap_or_default();
        tracing::info!(
            kind = event.kind(),
            wix_transaction_id = event.wix_transaction_id(),
            %payload,
            "Platform delivery disabled; event not sent"
        );
        Ok(DeliveryStatus::Discarded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::PlatformEvent;
    use crate::domain::ledger::DeclineReason;

    #[tokio::test]
    async fn events_are_discarded() {
        let event = PlatformEvent::transaction_rejected(
            "T1",
            DeclineReason::new(3041, "INVALID_ACCOUNT", "unknown"),
        );

        let status = LoggingEventSink::new().notify(&event).await.unwrap();

        assert_eq!(status, DeliveryStatus::Discarded);
    }
}
