//! Platform reason codes.
//!
//! The platform protocol reports business failures as a numeric reason code,
//! a symbolic error code and a human-readable message. The same triple is
//! used for declined transactions and rejected ledger calls.

use serde::{Deserialize, Serialize};

/// Reason code triple reported to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineReason {
    pub reason_code: u16,
    pub error_code: String,
    pub error_message: String,
}

impl DeclineReason {
    pub fn new(
        reason_code: u16,
        error_code: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            reason_code,
            error_code: error_code.into(),
            error_message: error_message.into(),
        }
    }

    /// `3019 CARD_LIMIT_EXCEEDED`.
    pub fn card_limit_exceeded() -> Self {
        Self::new(
            3019,
            "CARD_LIMIT_EXCEEDED",
            "Not enough funds left in the card limit for this transaction.",
        )
    }
}
