//! Ledger errors and their platform reason codes.
//!
//! # Platform Mapping
//!
//! Business failures are reported to the platform as a reason code triple,
//! not an HTTP error. The code depends on the operation that failed:
//!
//! | Error | connect | create | refund |
//! |-------|---------|--------|--------|
//! | UnsupportedCurrency | 2009 | 3003 | - |
//! | InvalidAccountDetails | 2002 | - | - |
//! | UnsupportedPaymentMethod | - | 3002 | - |
//! | UnknownAccount | - | 3041 | - |
//! | TransactionNotFound | - | - | 6000 |
//!
//! `InvalidRequest` has no reason code and surfaces as a bad request.
//! `Storage` and `AuthorizationUnavailable` have no reason code either; they
//! surface as server errors.

use thiserror::Error;

use super::DeclineReason;

/// Ledger operation, used to pick the reason code for an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOperation {
    Connect,
    CreateTransaction,
    Refund,
}

/// Errors raised by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Currency '{0}' is not supported")]
    UnsupportedCurrency(String),

    #[error("Payment method '{0}' is not supported")]
    UnsupportedPaymentMethod(String),

    #[error("Setup ID and email are required")]
    InvalidAccountDetails,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Merchant '{0}' has no connected account")]
    UnknownAccount(String),

    #[error("Transaction '{0}' not found")]
    TransactionNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authorization unavailable: {0}")]
    AuthorizationUnavailable(String),
}

impl LedgerError {
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage(message.into())
    }

    /// Input the caller can fix; raised before any write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::UnsupportedCurrency(_)
                | LedgerError::UnsupportedPaymentMethod(_)
                | LedgerError::InvalidAccountDetails
                | LedgerError::InvalidRequest(_)
        )
    }

    /// A referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::UnknownAccount(_) | LedgerError::TransactionNotFound(_)
        )
    }

    /// Reason code reported to the platform, if this is a business failure.
    pub fn platform_reason(&self, operation: LedgerOperation) -> Option<DeclineReason> {
        use LedgerOperation::*;
        let reason = match (self, operation) {
            (LedgerError::UnsupportedCurrency(_), Connect) => {
                DeclineReason::new(2009, "CURRENCY_IS_NOT_SUPPORTED", "Only EUR is supported")
            }
            (LedgerError::UnsupportedCurrency(_), _) => {
                DeclineReason::new(3003, "CURRENCY_IS_NOT_SUPPORTED", "Only EUR is supported")
            }
            (LedgerError::InvalidAccountDetails, _) => {
                DeclineReason::new(2002, "INVALID_ACCOUNT_DETAILS", "Provide setup ID and email")
            }
            (LedgerError::UnsupportedPaymentMethod(_), _) => DeclineReason::new(
                3002,
                "PAYMENT_TYPE_NOT_SUPPORTED",
                "Only credit card payments are supported",
            ),
            (LedgerError::UnknownAccount(_), _) => DeclineReason::new(
                3041,
                "INVALID_ACCOUNT",
                "Wix Merchant ID not registered wit Martini Payments",
            ),
            (LedgerError::TransactionNotFound(_), _) => DeclineReason::new(
                6000,
                "TRANSACTION_NOT_FOUND",
                "The transaction you tried to refund wasn't found. Please contact Martini Payments for support.",
            ),
            (LedgerError::InvalidRequest(_), _)
            | (LedgerError::Storage(_), _)
            | (LedgerError::AuthorizationUnavailable(_), _) => return None,
        };
        Some(reason)
    }
}
