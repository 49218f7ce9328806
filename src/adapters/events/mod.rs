//! Event sink adapters.
//!
//! - `PlatformEventSink` - delivers events to the platform over HTTPS
//! - `QueuedEventSink` + `EventDispatcher` - bounded queue drained in the background
//! - `LoggingEventSink` - logs and drops events when delivery is disabled
//! - `InMemoryEventSink` - captures events for tests

mod dispatcher;
mod in_memory;
mod logging;
mod platform_sink;

pub use dispatcher::{event_queue, DispatchStats, DispatcherConfig, EventDispatcher, QueuedEventSink};
pub use in_memory::InMemoryEventSink;
pub use logging::LoggingEventSink;
pub use platform_sink::{PlatformEventSink, PlatformSinkConfig, DEFAULT_EVENTS_URL, DEFAULT_TOKEN_URL};
