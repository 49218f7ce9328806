//! Transaction records and refund accumulation.

use serde::{Deserialize, Serialize};

use super::{AuthorizationOutcome, DeclineReason, TransactionStatus};
use crate::domain::foundation::{Amount, Currency, InternalTransactionId, MerchantId, RefundId};

/// Payment method reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// The only method this provider accepts.
    pub const CREDIT_CARD: &'static str = "creditCard";

    pub fn new(method: impl Into<String>) -> Self {
        Self(method.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `creditCard` (case-sensitive).
    pub fn is_supported(&self) -> bool {
        self.0 == Self::CREDIT_CARD
    }
}

/// A transaction stored under the platform's transaction id.
///
/// `internal_transaction_id`, `status` and `decline` are fixed at creation.
/// Refunds only ever add to `refunded_amount` and set `refund_id` once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub internal_transaction_id: InternalTransactionId,
    pub amount: Amount,
    pub currency: Currency,
    pub status: TransactionStatus,

    #[serde(rename = "wixMerchantId")]
    pub merchant_id: MerchantId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline: Option<DeclineReason>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<RefundId>,

    #[serde(default)]
    pub refunded_amount: Amount,
}

impl Transaction {
    /// Records a new transaction with the decider's outcome.
    pub fn record(
        amount: Amount,
        currency: Currency,
        merchant_id: MerchantId,
        outcome: AuthorizationOutcome,
    ) -> Self {
        let (status, decline) = outcome.into_parts();
        Self {
            internal_transaction_id: InternalTransactionId::new(),
            amount,
            currency,
            status,
            merchant_id,
            decline,
            refund_id: None,
            refunded_amount: Amount::ZERO,
        }
    }

    /// Adds a refund and returns the transaction's refund id, minting it on first use.
    pub fn apply_refund(&mut self, refund: Amount) -> RefundId {
        self.refunded_amount = self.refunded_amount.saturating_add(refund);
        *self.refund_id.get_or_insert_with(RefundId::new)
    }

    /// Decline reason reported for this transaction.
    ///
    /// Records written without a reason still report the default decline
    /// when their status is `DECLINED`.
    pub fn decline_reason(&self) -> Option<DeclineReason> {
        match self.status {
            TransactionStatus::Declined => Some(
                self.decline
                    .clone()
                    .unwrap_or_else(DeclineReason::card_limit_exceeded),
            ),
            _ => None,
        }
    }

    /// True once refunds add up to more than the transaction amount.
    pub fn is_over_refunded(&self) -> bool {
        self.refunded_amount > self.amount
    }
}
