//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers validate, serialize per ledger key, write through the store and
//! hand platform notifications to the event sink after the write commits.

pub mod handlers;
mod key_lock;

pub use handlers::{
    ConnectAccountCommand, ConnectAccountHandler, ConnectAccountResult, CreateTransactionCommand,
    CreateTransactionHandler, CreateTransactionResult, RefundOutcome, RefundTransactionCommand,
    RefundTransactionHandler,
};
pub use key_lock::{KeyGuard, KeyedLocks};
