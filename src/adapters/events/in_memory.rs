//! In-memory event sink for testing.
//!
//! Captures every notification instead of sending it.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It panics if its lock is poisoned.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::events::PlatformEvent;
use crate::ports::{DeliveryStatus, EventSink, NotifyError};

/// Event sink that records notifications for assertions.
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: RwLock<Vec<PlatformEvent>>,
    fail_with: Option<NotifyError>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every notification fails with a transport error.
    pub fn failing() -> Self {
        Self::failing_with(NotifyError::Transport("simulated outage".to_string()))
    }

    pub fn failing_with(error: NotifyError) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    // === Test Helpers ===

    /// Returns every recorded event, oldest first.
    pub fn events(&self) -> Vec<PlatformEvent> {
        self.events
            .read()
            .expect("InMemoryEventSink: lock poisoned")
            .clone()
    }

    pub fn event_count(&self) -> usize {
        self.events
            .read()
            .expect("InMemoryEventSink: lock poisoned")
            .len()
    }

    pub fn clear(&self) {
        self.events
            .write()
            .expect("InMemoryEventSink: lock poisoned")
            .clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn notify(&self, event: &PlatformEvent) -> Result<DeliveryStatus, NotifyError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.events
            .write()
            .expect("InMemoryEventSink: lock poisoned")
            .push(event.clone());
        Ok(DeliveryStatus::Delivered(200))
    }
}
