//! In-memory ledger store.
//!
//! Each collection sits behind its own `tokio::sync::RwLock`; every mutating
//! operation holds the write lock for its whole read-modify-write, which makes
//! it atomic per key. Data is lost when the process exits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{Amount, ExternalTransactionId, MerchantId, SetupId};
use crate::domain::ledger::{MerchantAccount, Transaction};
use crate::ports::{Inserted, LedgerStore, StoreError};

/// Ledger store backed by two hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    merchants: Arc<RwLock<HashMap<SetupId, MerchantAccount>>>,
    transactions: Arc<RwLock<HashMap<ExternalTransactionId, Transaction>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.merchants.read().await.len()
    }

    pub async fn transaction_count(&self) -> usize {
        self.transactions.read().await.len()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get_account(&self, setup_id: &SetupId) -> Result<Option<MerchantAccount>, StoreError> {
        Ok(self.merchants.read().await.get(setup_id).cloned())
    }

    async fn insert_account_if_absent(
        &self,
        setup_id: &SetupId,
        account: MerchantAccount,
    ) -> Result<Inserted<MerchantAccount>, StoreError> {
        let mut merchants = self.merchants.write().await;
        if let Some(existing) = merchants.get(setup_id) {
            return Ok(Inserted::Existing(existing.clone()));
        }
        merchants.insert(setup_id.clone(), account.clone());
        Ok(Inserted::Created(account))
    }

    async fn find_account_by_merchant(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Option<MerchantAccount>, StoreError> {
        Ok(self
            .merchants
            .read()
            .await
            .values()
            .find(|account| account.belongs_to(merchant_id))
            .cloned())
    }

    async fn get_transaction(
        &self,
        id: &ExternalTransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.transactions.read().await.get(id).cloned())
    }

    async fn insert_transaction_if_absent(
        &self,
        id: &ExternalTransactionId,
        transaction: Transaction,
    ) -> Result<Inserted<Transaction>, StoreError> {
        let mut transactions = self.transactions.write().await;
        if let Some(existing) = transactions.get(id) {
            return Ok(Inserted::Existing(existing.clone()));
        }
        transactions.insert(id.clone(), transaction.clone());
        Ok(Inserted::Created(transaction))
    }

    async fn apply_refund(
        &self,
        id: &ExternalTransactionId,
        refund: Amount,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut transactions = self.transactions.write().await;
        Ok(transactions.get_mut(id).map(|transaction| {
            transaction.apply_refund(refund);
            transaction.clone()
        }))
    }
}
