//! Authentication errors raised while verifying a signed platform request.
//!
//! These errors are **domain-centric**: they describe which step of the
//! verification protocol rejected the request, not which library failed.

use thiserror::Error;

/// Reasons a signed request is rejected.
///
/// Verification stops at the first failing step, so at most one reason applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The credential is malformed or its signature does not match the trusted key.
    #[error("Credential signature is invalid")]
    BadSignature,

    /// The credential's `exp` claim lies in the past.
    #[error("Credential has expired")]
    Expired,

    /// The credential is valid but was issued for a different request body.
    #[error("Request body does not match the signed digest")]
    BodyMismatch,
}

impl AuthError {
    /// Stable machine-readable code for the boundary layer.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::BadSignature => "BAD_SIGNATURE",
            AuthError::Expired => "EXPIRED",
            AuthError::BodyMismatch => "BODY_MISMATCH",
        }
    }
}
