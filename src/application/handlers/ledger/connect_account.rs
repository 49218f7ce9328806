//! ConnectAccountHandler - create-or-get a merchant account by setup id.

use std::sync::Arc;

use crate::domain::foundation::{Currency, MerchantId, SetupId};
use crate::domain::ledger::{LedgerError, MerchantAccount};
use crate::ports::LedgerStore;

/// Command to connect a merchant account.
#[derive(Debug, Clone)]
pub struct ConnectAccountCommand {
    pub currency: Currency,
    pub setup_id: Option<String>,
    pub email: Option<String>,
    pub merchant_id: Option<String>,
}

/// Result of a connect call.
#[derive(Debug, Clone)]
pub struct ConnectAccountResult {
    /// The account stored under the setup id.
    pub account: MerchantAccount,
    /// False when the setup id was already connected.
    pub created: bool,
}

/// Handler for connecting merchant accounts.
///
/// Idempotent per setup id: the first call creates the account and later
/// calls return it unchanged, whatever email or merchant id they carry.
pub struct ConnectAccountHandler {
    store: Arc<dyn LedgerStore>,
}

impl ConnectAccountHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(setup_id = cmd.setup_id.as_deref().unwrap_or_default())
    )]
    pub async fn handle(
        &self,
        cmd: ConnectAccountCommand,
    ) -> Result<ConnectAccountResult, LedgerError> {
        // 1. Validate before touching the store
        if !cmd.currency.is_supported() {
            return Err(LedgerError::UnsupportedCurrency(cmd.currency.code().to_string()));
        }
        let setup_id = cmd
            .setup_id
            .map(SetupId::new)
            .transpose()
            .map_err(|_| LedgerError::InvalidAccountDetails)?
            .ok_or(LedgerError::InvalidAccountDetails)?;
        let email = cmd
            .email
            .filter(|e| !e.trim().is_empty())
            .ok_or(LedgerError::InvalidAccountDetails)?;

        // 2. Replay returns the stored record
        if let Some(account) = self.store.get_account(&setup_id).await? {
            tracing::debug!(account_id = %account.account_id, "Account already connected");
            return Ok(ConnectAccountResult {
                account,
                created: false,
            });
        }

        // 3. Insert; a concurrent connect for the same setup id may win
        let merchant_id = MerchantId::new(cmd.merchant_id.unwrap_or_default());
        let candidate = MerchantAccount::open(email, merchant_id);
        let inserted = self.store.insert_account_if_absent(&setup_id, candidate).await?;
        let created = inserted.was_created();
        let account = inserted.into_inner();

        if created {
            tracing::info!(account_id = %account.account_id, "Merchant account connected");
        }

        Ok(ConnectAccountResult { account, created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryLedgerStore;

    fn command(setup_id: &str, email: &str) -> ConnectAccountCommand {
        ConnectAccountCommand {
            currency: Currency::eur(),
            setup_id: Some(setup_id.to_string()),
            email: Some(email.to_string()),
            merchant_id: Some("M1".to_string()),
        }
    }

    fn handler() -> (ConnectAccountHandler, Arc<InMemoryLedgerStore>) {
        let store = Arc::new(InMemoryLedgerStore::new());
        (ConnectAccountHandler::new(store.clone()), store)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Success
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn first_connect_creates_account() {
        let (handler, store) = handler();

        let result = handler.handle(command("S1", "a@x.com")).await.unwrap();

        assert!(result.created);
        assert_eq!(result.account.account_name, "a@x.com");
        assert_eq!(result.account.merchant_id, MerchantId::new("M1"));
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn reconnect_returns_original_record() {
        let (handler, store) = handler();
        let first = handler.handle(command("S1", "a@x.com")).await.unwrap();

        let mut second_cmd = command("S1", "other@x.com");
        second_cmd.merchant_id = Some("M2".to_string());
        let second = handler.handle(second_cmd).await.unwrap();

        assert!(!second.created);
        assert_eq!(second.account, first.account);
        assert_eq!(second.account.account_name, "a@x.com");
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn missing_merchant_id_is_stored_empty() {
        let (handler, _) = handler();
        let mut cmd = command("S1", "a@x.com");
        cmd.merchant_id = None;

        let result = handler.handle(cmd).await.unwrap();

        assert_eq!(result.account.merchant_id.as_str(), "");
    }

    #[tokio::test]
    async fn concurrent_connects_for_one_setup_id_store_one_account() {
        let (handler, store) = handler();
        let handler = Arc::new(handler);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let handler = handler.clone();
            tasks.push(tokio::spawn(async move {
                let mut cmd = command("S1", &format!("merchant{i}@x.com"));
                cmd.merchant_id = Some(format!("M{i}"));
                handler.handle(cmd).await.unwrap()
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        assert_eq!(store.account_count().await, 1);
        assert_eq!(results.iter().filter(|r| r.created).count(), 1);
        let stored = store
            .get_account(&SetupId::new("S1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(results.iter().all(|r| r.account == stored));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn non_eur_currency_is_rejected_without_write() {
        let (handler, store) = handler();
        let mut cmd = command("S1", "a@x.com");
        cmd.currency = Currency::new("USD");

        let result = handler.handle(cmd).await;

        assert_eq!(result.unwrap_err(), LedgerError::UnsupportedCurrency("USD".into()));
        assert_eq!(store.account_count().await, 0);
    }

    #[tokio::test]
    async fn missing_setup_id_is_rejected() {
        let (handler, _) = handler();
        let mut cmd = command("S1", "a@x.com");
        cmd.setup_id = None;

        assert_eq!(
            handler.handle(cmd).await.unwrap_err(),
            LedgerError::InvalidAccountDetails
        );
    }

    #[tokio::test]
    async fn empty_email_is_rejected() {
        let (handler, store) = handler();

        let result = handler.handle(command("S1", "")).await;

        assert_eq!(result.unwrap_err(), LedgerError::InvalidAccountDetails);
        assert_eq!(store.account_count().await, 0);
    }

    #[tokio::test]
    async fn currency_is_checked_before_account_details() {
        let (handler, _) = handler();
        let cmd = ConnectAccountCommand {
            currency: Currency::new("GBP"),
            setup_id: None,
            email: None,
            merchant_id: None,
        };

        assert!(matches!(
            handler.handle(cmd).await,
            Err(LedgerError::UnsupportedCurrency(_))
        ));
    }
}
