//! Ledger module - merchant accounts, transactions and refunds.
//!
//! # Records
//!
//! - `MerchantAccount` - keyed by setup id, created once, never changed
//! - `Transaction` - keyed by the platform transaction id; status fixed at
//!   creation, refunds accumulate on the record
//!
//! Records serialize with the field names the platform-facing store has
//! always used (`accountId`, `wixMerchantId`, `refundedAmount`, ...).

mod account;
mod errors;
mod reason;
mod status;
mod transaction;

pub use account::MerchantAccount;
pub use errors::{LedgerError, LedgerOperation};
pub use reason::DeclineReason;
pub use status::{AuthorizationOutcome, TransactionStatus, PENDING_REASON_CODE};
pub use transaction::{PaymentMethod, Transaction};
