//! CreateTransactionHandler - create-or-get a transaction by the platform's id.

use std::sync::Arc;

use crate::application::KeyedLocks;
use crate::domain::events::PlatformEvent;
use crate::domain::foundation::{Amount, Currency, ExternalTransactionId, MerchantId};
use crate::domain::ledger::{LedgerError, LedgerOperation, PaymentMethod, Transaction};
use crate::ports::{AuthorizationDecider, AuthorizationRequest, EventSink, LedgerStore};

use super::{notify_platform, transaction_lock_key};

/// Command to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub currency: Currency,
    pub payment_method: PaymentMethod,
    pub merchant_id: MerchantId,
    pub total_amount: Amount,
    pub external_transaction_id: String,
}

/// Result of a create call.
#[derive(Debug, Clone)]
pub struct CreateTransactionResult {
    pub transaction: Transaction,
    /// False when the call replayed an existing transaction.
    pub created: bool,
}

/// Handler for creating transactions.
///
/// # Flow
///
/// 1. Stateless checks: currency, then payment method
/// 2. The merchant must have a connected account
/// 3. An existing transaction is returned verbatim
/// 4. Otherwise the decider picks the outcome and the record is inserted
///
/// Steps 3 and 4 run under a per-key lock, so the decider is consulted at
/// most once per transaction id in this process. The store's
/// insert-if-absent keeps the record unique across processes.
///
/// Settled outcomes and business rejections are reported to the platform
/// through the event sink. Notification failures are logged and ignored.
pub struct CreateTransactionHandler {
    store: Arc<dyn LedgerStore>,
    decider: Arc<dyn AuthorizationDecider>,
    events: Arc<dyn EventSink>,
    locks: Arc<KeyedLocks>,
}

impl CreateTransactionHandler {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        decider: Arc<dyn AuthorizationDecider>,
        events: Arc<dyn EventSink>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            store,
            decider,
            events,
            locks,
        }
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(wix_transaction_id = %cmd.external_transaction_id, merchant_id = %cmd.merchant_id)
    )]
    pub async fn handle(
        &self,
        cmd: CreateTransactionCommand,
    ) -> Result<CreateTransactionResult, LedgerError> {
        let wix_transaction_id = cmd.external_transaction_id.clone();

        match self.execute(cmd).await {
            Ok(result) => {
                if let Some(event) =
                    PlatformEvent::transaction_settled(&wix_transaction_id, &result.transaction)
                {
                    notify_platform(self.events.as_ref(), &event).await;
                }
                Ok(result)
            }
            Err(err) => {
                if let Some(reason) = err.platform_reason(LedgerOperation::CreateTransaction) {
                    let event = PlatformEvent::transaction_rejected(&wix_transaction_id, reason);
                    notify_platform(self.events.as_ref(), &event).await;
                }
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        cmd: CreateTransactionCommand,
    ) -> Result<CreateTransactionResult, LedgerError> {
        // 1. Stateless validation
        if !cmd.currency.is_supported() {
            return Err(LedgerError::UnsupportedCurrency(cmd.currency.code().to_string()));
        }
        if !cmd.payment_method.is_supported() {
            return Err(LedgerError::UnsupportedPaymentMethod(
                cmd.payment_method.as_str().to_string(),
            ));
        }
        let external_id = ExternalTransactionId::new(cmd.external_transaction_id)
            .map_err(|e| LedgerError::InvalidRequest(e.to_string()))?;

        // 2. Merchant must be connected
        if self
            .store
            .find_account_by_merchant(&cmd.merchant_id)
            .await?
            .is_none()
        {
            tracing::info!("Transaction for unknown merchant rejected");
            return Err(LedgerError::UnknownAccount(cmd.merchant_id.to_string()));
        }

        let _guard = self.locks.lock(transaction_lock_key(&external_id)).await;

        // 3. Replay
        if let Some(transaction) = self.store.get_transaction(&external_id).await? {
            tracing::debug!(status = %transaction.status, "Replaying existing transaction");
            return Ok(CreateTransactionResult {
                transaction,
                created: false,
            });
        }

        // 4. Decide and record
        let request = AuthorizationRequest {
            external_transaction_id: external_id.clone(),
            merchant_id: cmd.merchant_id.clone(),
            amount: cmd.total_amount,
            currency: cmd.currency.clone(),
        };
        let outcome = self.decider.decide(&request).await?;
        let candidate = Transaction::record(cmd.total_amount, cmd.currency, cmd.merchant_id, outcome);

        let inserted = self
            .store
            .insert_transaction_if_absent(&external_id, candidate)
            .await?;
        let created = inserted.was_created();
        let transaction = inserted.into_inner();

        if created {
            tracing::info!(
                internal_transaction_id = %transaction.internal_transaction_id,
                status = %transaction.status,
                amount = %transaction.amount,
                "Transaction recorded"
            );
        } else {
            tracing::warn!("Transaction recorded concurrently by another instance");
        }

        Ok(CreateTransactionResult {
            transaction,
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::decider::FixedAuthorizationDecider;
    use crate::adapters::events::InMemoryEventSink;
    use crate::adapters::storage::InMemoryLedgerStore;
    use crate::domain::events::EventBody;
    use crate::domain::foundation::SetupId;
    use crate::domain::ledger::{AuthorizationOutcome, MerchantAccount, TransactionStatus};

    struct Fixture {
        handler: Arc<CreateTransactionHandler>,
        store: Arc<InMemoryLedgerStore>,
        decider: Arc<FixedAuthorizationDecider>,
        events: Arc<InMemoryEventSink>,
    }

    async fn fixture(outcome: AuthorizationOutcome) -> Fixture {
        let store = Arc::new(InMemoryLedgerStore::new());
        store
            .insert_account_if_absent(
                &SetupId::new("S1").unwrap(),
                MerchantAccount::open("a@x.com", MerchantId::new("M1")),
            )
            .await
            .unwrap();
        let decider = Arc::new(FixedAuthorizationDecider::new(outcome));
        let events = Arc::new(InMemoryEventSink::new());
        let handler = Arc::new(CreateTransactionHandler::new(
            store.clone(),
            decider.clone(),
            events.clone(),
            Arc::new(KeyedLocks::new()),
        ));
        Fixture {
            handler,
            store,
            decider,
            events,
        }
    }

    fn command(id: &str) -> CreateTransactionCommand {
        CreateTransactionCommand {
            currency: Currency::eur(),
            payment_method: PaymentMethod::new("creditCard"),
            merchant_id: MerchantId::new("M1"),
            total_amount: Amount::from(500),
            external_transaction_id: id.to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Creation and replay
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn approved_transaction_is_recorded_and_reported() {
        let f = fixture(AuthorizationOutcome::Approved).await;

        let result = f.handler.handle(command("T1")).await.unwrap();

        assert!(result.created);
        assert_eq!(result.transaction.status, TransactionStatus::Approved);
        assert_eq!(result.transaction.amount, Amount::from(500));
        assert_eq!(f.store.transaction_count().await, 1);

        let events = f.events.events();
        assert_eq!(events.len(), 1);
        match &events[0].event {
            EventBody::Transaction(e) => {
                assert_eq!(e.wix_transaction_id, "T1");
                assert_eq!(
                    e.plugin_transaction_id,
                    Some(result.transaction.internal_transaction_id)
                );
                assert!(e.reason.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn replay_returns_same_record_without_deciding_again() {
        let f = fixture(AuthorizationOutcome::declined()).await;

        let first = f.handler.handle(command("T1")).await.unwrap();
        let second = f.handler.handle(command("T1")).await.unwrap();

        assert!(!second.created);
        assert_eq!(first.transaction, second.transaction);
        assert_eq!(f.decider.calls(), 1);
        assert_eq!(f.store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn pending_transaction_sends_no_event() {
        let f = fixture(AuthorizationOutcome::Pending).await;

        let result = f.handler.handle(command("T1")).await.unwrap();

        assert_eq!(result.transaction.status, TransactionStatus::Pending);
        assert!(f.events.events().is_empty());
    }

    #[tokio::test]
    async fn concurrent_creates_consult_decider_once() {
        let f = fixture(AuthorizationOutcome::Approved).await;

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let handler = f.handler.clone();
            tasks.push(tokio::spawn(async move { handler.handle(command("T1")).await }));
        }
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap().unwrap().transaction.internal_transaction_id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(f.decider.calls(), 1);
        assert_eq!(f.store.transaction_count().await, 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unsupported_currency_is_rejected_and_reported() {
        let f = fixture(AuthorizationOutcome::Approved).await;
        let mut cmd = command("T1");
        cmd.currency = Currency::new("USD");

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert_eq!(err, LedgerError::UnsupportedCurrency("USD".into()));
        assert_eq!(f.store.transaction_count().await, 0);
        assert_eq!(f.decider.calls(), 0);

        let events = f.events.events();
        match &events[0].event {
            EventBody::Transaction(e) => {
                assert_eq!(e.reason.as_ref().unwrap().reason_code, 3003);
                assert!(e.plugin_transaction_id.is_none());
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_payment_method_is_rejected() {
        let f = fixture(AuthorizationOutcome::Approved).await;
        let mut cmd = command("T1");
        cmd.payment_method = PaymentMethod::new("paypal");

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, LedgerError::UnsupportedPaymentMethod(_)));
        assert_eq!(f.store.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_merchant_writes_nothing() {
        let f = fixture(AuthorizationOutcome::Approved).await;
        let mut cmd = command("T1");
        cmd.merchant_id = MerchantId::new("M404");

        let err = f.handler.handle(cmd).await.unwrap_err();

        assert_eq!(err, LedgerError::UnknownAccount("M404".into()));
        assert_eq!(f.store.transaction_count().await, 0);
        assert_eq!(f.decider.calls(), 0);
        assert_eq!(f.events.events().len(), 1);
    }

    #[tokio::test]
    async fn decider_failure_records_nothing() {
        let store = Arc::new(InMemoryLedgerStore::new());
        store
            .insert_account_if_absent(
                &SetupId::new("S1").unwrap(),
                MerchantAccount::open("a@x.com", MerchantId::new("M1")),
            )
            .await
            .unwrap();
        let events = Arc::new(InMemoryEventSink::new());
        let handler = CreateTransactionHandler::new(
            store.clone(),
            Arc::new(FixedAuthorizationDecider::failing("processor offline")),
            events.clone(),
            Arc::new(KeyedLocks::new()),
        );

        let err = handler.handle(command("T1")).await.unwrap_err();

        assert!(matches!(err, LedgerError::AuthorizationUnavailable(_)));
        assert_eq!(store.transaction_count().await, 0);
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn failing_event_sink_does_not_fail_the_call() {
        let store = Arc::new(InMemoryLedgerStore::new());
        store
            .insert_account_if_absent(
                &SetupId::new("S1").unwrap(),
                MerchantAccount::open("a@x.com", MerchantId::new("M1")),
            )
            .await
            .unwrap();
        let handler = CreateTransactionHandler::new(
            store.clone(),
            Arc::new(FixedAuthorizationDecider::new(AuthorizationOutcome::Approved)),
            Arc::new(InMemoryEventSink::failing()),
            Arc::new(KeyedLocks::new()),
        );

        let result = handler.handle(command("T1")).await;

        assert!(result.is_ok());
        assert_eq!(store.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn blank_transaction_id_is_invalid() {
        let f = fixture(AuthorizationOutcome::Approved).await;

        let err = f.handler.handle(command("  ")).await.unwrap_err();

        assert!(matches!(err, LedgerError::InvalidRequest(_)));
        assert!(f.events.events().is_empty());
    }
}
