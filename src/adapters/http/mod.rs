//! HTTP adapters - REST API implementations.
//!
//! - `payments` - Platform-facing endpoints
//! - `middleware` - Signed-request authentication

pub mod middleware;
pub mod payments;

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub use middleware::AuthState;
pub use payments::{payments_routes, PaymentsApiError, PaymentsAppState};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the complete application router.
///
/// Every request gets an `x-request-id` (generated when absent), is traced,
/// and is cut off after `request_timeout`.
pub fn app_router(state: PaymentsAppState, auth: AuthState, request_timeout: Duration) -> Router {
    payments_routes(auth)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
