//! Notifications sent back to the platform.
//!
//! Every event serializes as `{"event": {"transaction": {...}}}` or
//! `{"event": {"refund": {...}}}`, the envelope the platform's events
//! endpoint accepts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Amount, InternalTransactionId, RefundId};
use crate::domain::ledger::{DeclineReason, Transaction};

/// Envelope for one platform notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub event: EventBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventBody {
    Transaction(TransactionEvent),
    Refund(RefundEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub wix_transaction_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_transaction_id: Option<InternalTransactionId>,

    #[serde(flatten)]
    pub reason: Option<DeclineReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundEvent {
    pub wix_transaction_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wix_refund_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_refund_id: Option<RefundId>,

    #[serde(flatten)]
    pub reason: Option<DeclineReason>,
}

impl PlatformEvent {
    /// Status report for a newly created or replayed transaction.
    ///
    /// Returns `None` for pending transactions, which are reported out of band.
    pub fn transaction_settled(wix_transaction_id: &str, transaction: &Transaction) -> Option<Self> {
        if !transaction.status.is_final() {
            return None;
        }
        Some(Self {
            event: EventBody::Transaction(TransactionEvent {
                wix_transaction_id: wix_transaction_id.to_string(),
                plugin_transaction_id: Some(transaction.internal_transaction_id),
                reason: transaction.decline_reason(),
            }),
        })
    }

    /// A transaction call rejected before anything was recorded.
    pub fn transaction_rejected(wix_transaction_id: &str, reason: DeclineReason) -> Self {
        Self {
            event: EventBody::Transaction(TransactionEvent {
                wix_transaction_id: wix_transaction_id.to_string(),
                plugin_transaction_id: None,
                reason: Some(reason),
            }),
        }
    }

    pub fn refund_completed(
        wix_transaction_id: &str,
        wix_refund_id: Option<String>,
        amount: Amount,
        refund_id: RefundId,
    ) -> Self {
        Self {
            event: EventBody::Refund(RefundEvent {
                wix_transaction_id: wix_transaction_id.to_string(),
                wix_refund_id,
                amount: Some(amount),
                plugin_refund_id: Some(refund_id),
                reason: None,
            }),
        }
    }

    pub fn refund_rejected(
        wix_transaction_id: &str,
        wix_refund_id: Option<String>,
        reason: DeclineReason,
    ) -> Self {
        Self {
            event: EventBody::Refund(RefundEvent {
                wix_transaction_id: wix_transaction_id.to_string(),
                wix_refund_id,
                amount: None,
                plugin_refund_id: None,
                reason: Some(reason),
            }),
        }
    }

    /// `"transaction"` or `"refund"`, for logs.
    pub fn kind(&self) -> &'static str {
        match self.event {
            EventBody::Transaction(_) => "transaction",
            EventBody::Refund(_) => "refund",
        }
    }

    pub fn wix_transaction_id(&self) -> &str {
        match &self.event {
            EventBody::Transaction(e) => &e.wix_transaction_id,
            EventBody::Refund(e) => &e.wix_transaction_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, MerchantId};
    use crate::domain::ledger::AuthorizationOutcome;

    fn transaction(outcome: AuthorizationOutcome) -> Transaction {
        Transaction::record(Amount::from(500), Currency::eur(), MerchantId::new("M1"), outcome)
    }

    #[test]
    fn approved_transaction_event_shape() {
        let tx = transaction(AuthorizationOutcome::Approved);
        let event = PlatformEvent::transaction_settled("T1", &tx).unwrap();
        let json = serde_json::to_value(&event).unwrap();

        let body = &json["event"]["transaction"];
        assert_eq!(body["wixTransactionId"], "T1");
        assert_eq!(body["pluginTransactionId"], tx.internal_transaction_id.to_string());
        assert!(body.get("reasonCode").is_none());
    }

    #[test]
    fn declined_transaction_event_includes_reason() {
        let tx = transaction(AuthorizationOutcome::declined());
        let event = PlatformEvent::transaction_settled("T1", &tx).unwrap();
        let json = serde_json::to_value(&event).unwrap();

        let body = &json["event"]["transaction"];
        assert_eq!(body["reasonCode"], 3019);
        assert_eq!(body["errorCode"], "CARD_LIMIT_EXCEEDED");
    }

    #[test]
    fn declined_record_without_reason_reports_default_decline() {
        let mut tx = transaction(AuthorizationOutcome::declined());
        tx.decline = None;
        let event = PlatformEvent::transaction_settled("T1", &tx).unwrap();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"]["transaction"]["reasonCode"], 3019);
    }

    #[test]
    fn pending_transaction_sends_no_event() {
        let tx = transaction(AuthorizationOutcome::Pending);
        assert!(PlatformEvent::transaction_settled("T1", &tx).is_none());
    }

    #[test]
    fn rejected_transaction_event_has_no_plugin_id() {
        let reason = DeclineReason::new(3041, "INVALID_ACCOUNT", "unknown");
        let json = serde_json::to_value(PlatformEvent::transaction_rejected("T9", reason)).unwrap();

        let body = &json["event"]["transaction"];
        assert_eq!(body["reasonCode"], 3041);
        assert!(body.get("pluginTransactionId").is_none());
    }

    #[test]
    fn refund_event_shape() {
        let refund_id = RefundId::new();
        let event = PlatformEvent::refund_completed(
            "T1",
            Some("WR1".to_string()),
            Amount::from(30),
            refund_id,
        );
        let json = serde_json::to_value(&event).unwrap();

        let body = &json["event"]["refund"];
        assert_eq!(body["wixTransactionId"], "T1");
        assert_eq!(body["wixRefundId"], "WR1");
        assert_eq!(body["amount"], 30);
        assert_eq!(body["pluginRefundId"], refund_id.to_string());
        assert_eq!(event.kind(), "refund");
    }

    #[test]
    fn refund_rejection_carries_reason() {
        let reason = DeclineReason::new(6000, "TRANSACTION_NOT_FOUND", "missing");
        let event = PlatformEvent::refund_rejected("T9", None, reason);
        let json = serde_json::to_value(&event).unwrap();

        let body = &json["event"]["refund"];
        assert_eq!(body["reasonCode"], 6000);
        assert!(body.get("wixRefundId").is_none());
        assert_eq!(event.wix_transaction_id(), "T9");
    }
}
