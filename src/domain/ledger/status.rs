//! Transaction status and the authorization outcome that fixes it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DeclineReason;

/// Reason code the platform expects alongside a pending transaction.
pub const PENDING_REASON_CODE: u16 = 5005;

/// Status of a transaction, fixed when the transaction is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Funds are held for the merchant.
    Approved,

    /// Final failure; the transaction carries a decline reason.
    Declined,

    /// Awaiting an out-of-band status update.
    Pending,
}

impl TransactionStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Approved => "APPROVED",
            TransactionStatus::Declined => "DECLINED",
            TransactionStatus::Pending => "PENDING",
        }
    }

    /// Returns true when the platform should be notified right away.
    ///
    /// Pending transactions are reported later, out of band.
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of consulting the authorization decider for a new transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Approved,
    Declined(DeclineReason),
    Pending,
}

impl AuthorizationOutcome {
    /// A decline for exceeding the card limit, the default decline reason.
    pub fn declined() -> Self {
        AuthorizationOutcome::Declined(DeclineReason::card_limit_exceeded())
    }

    /// Status recorded for this outcome.
    pub fn status(&self) -> TransactionStatus {
        match self {
            AuthorizationOutcome::Approved => TransactionStatus::Approved,
            AuthorizationOutcome::Declined(_) => TransactionStatus::Declined,
            AuthorizationOutcome::Pending => TransactionStatus::Pending,
        }
    }

    /// Splits the outcome into the status and optional decline reason.
    pub fn into_parts(self) -> (TransactionStatus, Option<DeclineReason>) {
        match self {
            AuthorizationOutcome::Declined(reason) => (TransactionStatus::Declined, Some(reason)),
            other => (other.status(), None),
        }
    }
}
