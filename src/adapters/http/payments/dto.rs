//! HTTP DTOs for the platform-facing payment endpoints.
//!
//! Field names follow the platform's camelCase protocol. Request fields the
//! platform may omit are optional here so that a missing value reaches the
//! ledger's own validation and earns its reason code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ledger::{MerchantAccount, Transaction, TransactionStatus, PENDING_REASON_CODE};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to connect a merchant account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    #[serde(default)]
    pub currency: Option<String>,
    /// Credentials entered by the merchant; echoed back verbatim.
    #[serde(default)]
    pub credentials: Map<String, Value>,
    #[serde(default)]
    pub wix_merchant_id: Option<String>,
}

impl ConnectRequest {
    /// A credential field, when it is a string.
    pub fn credential(&self, name: &str) -> Option<String> {
        self.credentials
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

/// Request to create (or replay) a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub order: OrderDto,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub wix_merchant_id: String,
    #[serde(default)]
    pub wix_transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderDto {
    pub description: OrderDescriptionDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDescriptionDto {
    #[serde(default)]
    pub currency: String,
    /// Minor units.
    pub total_amount: u64,
}

/// Request to refund part of a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    #[serde(default)]
    pub wix_transaction_id: String,
    #[serde(default)]
    pub wix_refund_id: Option<String>,
    /// Minor units.
    pub refund_amount: u64,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a connected account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectResponse {
    /// `merchantId` set to the account id, overlaid with the request's credentials.
    pub credentials: Map<String, Value>,
    pub account_id: String,
    pub account_name: String,
}

impl ConnectResponse {
    pub fn new(account: &MerchantAccount, echoed: Map<String, Value>) -> Self {
        let mut credentials = Map::new();
        credentials.insert(
            "merchantId".to_string(),
            Value::String(account.account_id.to_string()),
        );
        credentials.extend(echoed);

        Self {
            credentials,
            account_id: account.account_id.to_string(),
            account_name: account.account_name.clone(),
        }
    }
}

/// Response for a created or replayed transaction.
///
/// - APPROVED: `{pluginTransactionId}`
/// - DECLINED: `{pluginTransactionId, reasonCode, errorCode, errorMessage}`
/// - PENDING: `{wixTransactionId, pluginTransactionId, reasonCode}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wix_transaction_id: Option<String>,
    pub plugin_transaction_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TransactionResponse {
    pub fn new(wix_transaction_id: &str, transaction: &Transaction) -> Self {
        let plugin_transaction_id = transaction.internal_transaction_id.to_string();
        match (transaction.status, transaction.decline_reason()) {
            (TransactionStatus::Pending, _) => Self {
                wix_transaction_id: Some(wix_transaction_id.to_string()),
                plugin_transaction_id,
                reason_code: Some(PENDING_REASON_CODE),
                error_code: None,
                error_message: None,
            },
            (_, Some(reason)) => Self {
                wix_transaction_id: None,
                plugin_transaction_id,
                reason_code: Some(reason.reason_code),
                error_code: Some(reason.error_code),
                error_message: Some(reason.error_message),
            },
            (_, None) => Self {
                wix_transaction_id: None,
                plugin_transaction_id,
                reason_code: None,
                error_code: None,
                error_message: None,
            },
        }
    }
}

/// Response for an applied refund.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub plugin_refund_id: String,
}

/// Error response for failures the platform protocol has no reason code for.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
