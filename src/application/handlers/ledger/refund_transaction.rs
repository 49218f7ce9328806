//! RefundTransactionHandler - accumulate refunds on an existing transaction.

use std::sync::Arc;

use crate::application::KeyedLocks;
use crate::domain::events::PlatformEvent;
use crate::domain::foundation::{Amount, ExternalTransactionId, RefundId};
use crate::domain::ledger::{LedgerError, LedgerOperation, Transaction};
use crate::ports::{EventSink, LedgerStore};

use super::{notify_platform, transaction_lock_key};

/// Command to refund part or all of a transaction.
#[derive(Debug, Clone)]
pub struct RefundTransactionCommand {
    pub external_transaction_id: String,
    /// The platform's own refund id, echoed back in the notification.
    pub wix_refund_id: Option<String>,
    pub refund_amount: Amount,
}

/// Result of a refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundOutcome {
    /// Stable across every refund of the same transaction.
    pub refund_id: RefundId,
    /// Cumulative refunded amount after this refund.
    pub refunded_amount: Amount,
    pub transaction: Transaction,
}

/// Handler for refunds.
///
/// Every call adds its amount; there is no cap at the transaction amount and
/// no status gate. Overshooting the amount is logged as a warning.
pub struct RefundTransactionHandler {
    store: Arc<dyn LedgerStore>,
    events: Arc<dyn EventSink>,
    locks: Arc<KeyedLocks>,
}

impl RefundTransactionHandler {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        events: Arc<dyn EventSink>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            store,
            events,
            locks,
        }
    }

    #[tracing::instrument(
        skip(self, cmd),
        fields(wix_transaction_id = %cmd.external_transaction_id, amount = %cmd.refund_amount)
    )]
    pub async fn handle(&self, cmd: RefundTransactionCommand) -> Result<RefundOutcome, LedgerError> {
        let result = self.execute(&cmd).await;

        let event = match &result {
            Ok(outcome) => Some(PlatformEvent::refund_completed(
                &cmd.external_transaction_id,
                cmd.wix_refund_id.clone(),
                cmd.refund_amount,
                outcome.refund_id,
            )),
            Err(err) => err.platform_reason(LedgerOperation::Refund).map(|reason| {
                PlatformEvent::refund_rejected(
                    &cmd.external_transaction_id,
                    cmd.wix_refund_id.clone(),
                    reason,
                )
            }),
        };
        if let Some(event) = event {
            notify_platform(self.events.as_ref(), &event).await;
        }

        result
    }

    async fn execute(&self, cmd: &RefundTransactionCommand) -> Result<RefundOutcome, LedgerError> {
        let not_found = || LedgerError::TransactionNotFound(cmd.external_transaction_id.clone());

        // A blank id can never name a stored transaction.
        let external_id = ExternalTransactionId::new(cmd.external_transaction_id.as_str())
            .map_err(|_| not_found())?;

        let _guard = self.locks.lock(transaction_lock_key(&external_id)).await;

        let transaction = self
            .store
            .apply_refund(&external_id, cmd.refund_amount)
            .await?
            .ok_or_else(not_found)?;

        let refund_id = transaction
            .refund_id
            .ok_or_else(|| LedgerError::storage("refund applied without a refund id"))?;

        if transaction.is_over_refunded() {
            tracing::warn!(
                refunded_amount = %transaction.refunded_amount,
                transaction_amount = %transaction.amount,
                "Refunds exceed the transaction amount"
            );
        } else {
            tracing::info!(
                refund_id = %refund_id,
                refunded_amount = %transaction.refunded_amount,
                "Refund applied"
            );
        }

        Ok(RefundOutcome {
            refund_id,
            refunded_amount: transaction.refunded_amount,
            transaction,
        })
    }
}
