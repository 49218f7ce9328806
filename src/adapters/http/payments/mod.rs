//! HTTP adapter for the platform-facing payment endpoints.
//!
//! - `GET /` - Service banner
//! - `POST /connect` - Connect a merchant account
//! - `POST /transaction` - Create or replay a transaction
//! - `POST /refund` - Refund part of a transaction

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentsApiError, PaymentsAppState, SERVICE_BANNER};
pub use routes::payments_routes;
