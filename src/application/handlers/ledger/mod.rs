//! Ledger command handlers: connect, create transaction, refund.

mod connect_account;
mod create_transaction;
mod refund_transaction;

pub use connect_account::{ConnectAccountCommand, ConnectAccountHandler, ConnectAccountResult};
pub use create_transaction::{
    CreateTransactionCommand, CreateTransactionHandler, CreateTransactionResult,
};
pub use refund_transaction::{RefundOutcome, RefundTransactionCommand, RefundTransactionHandler};

use crate::domain::events::PlatformEvent;
use crate::domain::foundation::ExternalTransactionId;
use crate::ports::EventSink;

/// Lock key shared by create and refund for one transaction.
fn transaction_lock_key(id: &ExternalTransactionId) -> String {
    format!("transaction:{}", id)
}

/// Hands an event to the sink. Failures never reach the caller.
async fn notify_platform(events: &dyn EventSink, event: &PlatformEvent) {
    match events.notify(event).await {
        Ok(status) => {
            tracing::debug!(kind = event.kind(), ?status, "Platform event handed off");
        }
        Err(err) => {
            tracing::warn!(
                kind = event.kind(),
                wix_transaction_id = event.wix_transaction_id(),
                error = %err,
                "Platform event not delivered"
            );
        }
    }
}
