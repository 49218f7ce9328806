//! HTTP middleware for axum.
//!
//! - `auth` - Verifies platform-signed requests before any handler runs

pub mod auth;

pub use auth::{
    auth_middleware, AuthRejection, AuthState, VerifiedRequest, DEFAULT_CREDENTIAL_HEADER,
    MAX_SIGNED_BODY_BYTES,
};
