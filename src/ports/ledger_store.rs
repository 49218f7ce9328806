//! LedgerStore port - keyed persistence for merchant accounts and transactions.
//!
//! Two collections: `merchants` keyed by setup id and `transactions` keyed by
//! the platform transaction id. Every write replaces one complete record, and
//! every mutating operation is atomic for its key.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{Amount, ExternalTransactionId, MerchantId, SetupId};
use crate::domain::ledger::{LedgerError, MerchantAccount, Transaction};

/// Errors raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Stored record could not be decoded: {0}")]
    Corrupt(String),

    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

/// Result of a compare-and-set insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted<T> {
    /// The offered record was stored.
    Created(T),
    /// A record already existed; it is returned unchanged.
    Existing(T),
}

impl<T> Inserted<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Inserted::Created(_))
    }

    /// The record now stored under the key.
    pub fn into_inner(self) -> T {
        match self {
            Inserted::Created(record) | Inserted::Existing(record) => record,
        }
    }
}

/// Persistence for the ledger.
///
/// # Contract
///
/// - `insert_*_if_absent` never overwrites: when the key exists the stored
///   record is returned as `Inserted::Existing` and the offered one is dropped.
/// - `apply_refund` is an atomic read-modify-write: it adds to
///   `refundedAmount`, sets `refundId` if absent, and returns the updated record.
///   Returns `Ok(None)` when the transaction does not exist.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get_account(&self, setup_id: &SetupId) -> Result<Option<MerchantAccount>, StoreError>;

    async fn insert_account_if_absent(
        &self,
        setup_id: &SetupId,
        account: MerchantAccount,
    ) -> Result<Inserted<MerchantAccount>, StoreError>;

    /// Finds any account connected for the given platform merchant.
    async fn find_account_by_merchant(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Option<MerchantAccount>, StoreError>;

    async fn get_transaction(
        &self,
        id: &ExternalTransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    async fn insert_transaction_if_absent(
        &self,
        id: &ExternalTransactionId,
        transaction: Transaction,
    ) -> Result<Inserted<Transaction>, StoreError>;

    async fn apply_refund(
        &self,
        id: &ExternalTransactionId,
        refund: Amount,
    ) -> Result<Option<Transaction>, StoreError>;
}
