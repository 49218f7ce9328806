//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, money, validation errors)
//! - `auth` - Signed-request claims, payload digests and auth errors
//! - `ledger` - Merchant accounts, transactions, refunds and reason codes
//! - `events` - Notifications sent back to the platform

pub mod auth;
pub mod events;
pub mod foundation;
pub mod ledger;
