//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Signed-request verification (RS256, mock)
//! - `decider` - Authorization outcome for new transactions
//! - `events` - Platform notifications (HTTPS, queue, in-memory)
//! - `http` - Axum REST surface
//! - `storage` - Ledger persistence (in-memory, Redis)

pub mod auth;
pub mod decider;
pub mod events;
pub mod http;
pub mod storage;

pub use auth::{JwtRequestVerifier, MockRequestAuthenticator};
pub use decider::{FixedAuthorizationDecider, RandomAuthorizationDecider};
pub use events::{
    event_queue, EventDispatcher, InMemoryEventSink, LoggingEventSink, PlatformEventSink,
    QueuedEventSink,
};
pub use http::{app_router, AuthState, PaymentsAppState};
pub use storage::{InMemoryLedgerStore, RedisLedgerStore};
