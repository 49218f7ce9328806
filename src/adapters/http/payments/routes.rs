//! Axum router configuration for the payment endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers::{
    banner, connect_account, create_transaction, refund_transaction, PaymentsAppState,
};
use crate::adapters::http::middleware::{auth_middleware, AuthState};

/// Create the payments router.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Service banner
///
/// ## Platform Endpoints (signed credential required)
/// - `POST /connect` - Connect a merchant account
/// - `POST /transaction` - Create or replay a transaction
/// - `POST /refund` - Refund part of a transaction
pub fn payments_routes(auth: AuthState) -> Router<PaymentsAppState> {
    let signed = Router::new()
        .route("/connect", post(connect_account))
        .route("/transaction", post(create_transaction))
        .route("/refund", post(refund_transaction))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new().route("/", get(banner)).merge(signed)
}
