//! AuthorizationDecider port - decides the outcome of a new transaction.
//!
//! Stands in for card-network processing. Consulted once per new
//! transaction; replays never reach it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Amount, Currency, ExternalTransactionId, MerchantId};
use crate::domain::ledger::{AuthorizationOutcome, LedgerError};

/// What the decider is asked to authorize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub external_transaction_id: ExternalTransactionId,
    pub merchant_id: MerchantId,
    pub amount: Amount,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Authorization decider failed: {0}")]
pub struct DeciderError(pub String);

impl From<DeciderError> for LedgerError {
    fn from(err: DeciderError) -> Self {
        LedgerError::AuthorizationUnavailable(err.0)
    }
}

#[async_trait]
pub trait AuthorizationDecider: Send + Sync {
    async fn decide(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, DeciderError>;
}
