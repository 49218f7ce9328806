//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RequestAuthenticator` - verifies platform-signed requests
//! - `LedgerStore` - keyed, per-key atomic persistence
//! - `AuthorizationDecider` - outcome of a new transaction
//! - `EventSink` - notifications back to the platform

mod authorization_decider;
mod event_sink;
mod ledger_store;
mod request_authenticator;

pub use authorization_decider::{AuthorizationDecider, AuthorizationRequest, DeciderError};
pub use event_sink::{DeliveryStatus, EventSink, NotifyError};
pub use ledger_store::{Inserted, LedgerStore, StoreError};
pub use request_authenticator::RequestAuthenticator;
