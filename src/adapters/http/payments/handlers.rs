//! HTTP handlers for the platform-facing payment endpoints.
//!
//! These handlers connect Axum routes to the ledger command handlers.
//! Authentication has already happened in the middleware by the time any of
//! them runs.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{
    ConnectAccountCommand, ConnectAccountHandler, CreateTransactionCommand,
    CreateTransactionHandler, KeyedLocks, RefundTransactionCommand, RefundTransactionHandler,
};
use crate::domain::foundation::{Amount, Currency, MerchantId};
use crate::domain::ledger::{LedgerError, LedgerOperation, PaymentMethod};
use crate::ports::{AuthorizationDecider, EventSink, LedgerStore};

use super::dto::{
    ConnectRequest, ConnectResponse, CreateTransactionRequest, ErrorResponse, RefundRequest,
    RefundResponse, TransactionResponse,
};

/// Banner served on `GET /`.
pub const SERVICE_BANNER: &str = "Martini Payments Provider";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request. `locks` must be shared by every clone so that create
/// and refund serialize on the same table.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub store: Arc<dyn LedgerStore>,
    pub decider: Arc<dyn AuthorizationDecider>,
    pub events: Arc<dyn EventSink>,
    pub locks: Arc<KeyedLocks>,
}

impl PaymentsAppState {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        decider: Arc<dyn AuthorizationDecider>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            decider,
            events,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn connect_account_handler(&self) -> ConnectAccountHandler {
        ConnectAccountHandler::new(self.store.clone())
    }

    pub fn create_transaction_handler(&self) -> CreateTransactionHandler {
        CreateTransactionHandler::new(
            self.store.clone(),
            self.decider.clone(),
            self.events.clone(),
            self.locks.clone(),
        )
    }

    pub fn refund_transaction_handler(&self) -> RefundTransactionHandler {
        RefundTransactionHandler::new(self.store.clone(), self.events.clone(), self.locks.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Service banner
pub async fn banner() -> &'static str {
    SERVICE_BANNER
}

/// POST /connect - Connect (or re-connect) a merchant account
pub async fn connect_account(
    State(state): State<PaymentsAppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let cmd = ConnectAccountCommand {
        currency: Currency::new(req.currency.clone().unwrap_or_default()),
        setup_id: req.credential("setupId"),
        email: req.credential("email"),
        merchant_id: req.wix_merchant_id.clone(),
    };

    let result = state
        .connect_account_handler()
        .handle(cmd)
        .await
        .map_err(|e| PaymentsApiError::new(LedgerOperation::Connect, e))?;

    Ok(Json(ConnectResponse::new(&result.account, req.credentials)))
}

/// POST /transaction - Create (or replay) a transaction
pub async fn create_transaction(
    State(state): State<PaymentsAppState>,
    Json(req): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let cmd = CreateTransactionCommand {
        currency: Currency::new(req.order.description.currency),
        payment_method: PaymentMethod::new(req.payment_method),
        merchant_id: MerchantId::new(req.wix_merchant_id),
        total_amount: Amount::from_minor_units(req.order.description.total_amount),
        external_transaction_id: req.wix_transaction_id.clone(),
    };

    let result = state
        .create_transaction_handler()
        .handle(cmd)
        .await
        .map_err(|e| PaymentsApiError::new(LedgerOperation::CreateTransaction, e))?;

    Ok(Json(TransactionResponse::new(
        &req.wix_transaction_id,
        &result.transaction,
    )))
}

/// POST /refund - Refund part of a transaction
pub async fn refund_transaction(
    State(state): State<PaymentsAppState>,
    Json(req): Json<RefundRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let cmd = RefundTransactionCommand {
        external_transaction_id: req.wix_transaction_id,
        wix_refund_id: req.wix_refund_id,
        refund_amount: Amount::from_minor_units(req.refund_amount),
    };

    let outcome = state
        .refund_transaction_handler()
        .handle(cmd)
        .await
        .map_err(|e| PaymentsApiError::new(LedgerOperation::Refund, e))?;

    Ok(Json(RefundResponse {
        plugin_refund_id: outcome.refund_id.to_string(),
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that implements IntoResponse.
///
/// Business failures are part of the platform protocol and go out as `200`
/// with a reason code body. Everything else is a real HTTP error.
#[derive(Debug)]
pub struct PaymentsApiError {
    operation: LedgerOperation,
    error: LedgerError,
}

impl PaymentsApiError {
    pub fn new(operation: LedgerOperation, error: LedgerError) -> Self {
        Self { operation, error }
    }
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        let operation = self.operation;
        if self.error.is_validation() {
            tracing::debug!(?operation, error = %self.error, "Ledger call refused");
        } else if self.error.is_not_found() {
            tracing::info!(?operation, error = %self.error, "Ledger record not found");
        } else {
            tracing::error!(?operation, error = %self.error, "Ledger call failed");
        }

        if let Some(reason) = self.error.platform_reason(self.operation) {
            return (StatusCode::OK, Json(reason)).into_response();
        }

        let (status, error_code) = match &self.error {
            LedgerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            LedgerError::AuthorizationUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "AUTHORIZATION_UNAVAILABLE")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse::new(error_code, self.error.to_string());
        (status, Json(body)).into_response()
    }
}
