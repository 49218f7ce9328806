//! Signed-request authentication vocabulary.
//!
//! The platform signs every inbound call with a short-lived credential whose
//! `data.SHA256` claim pins the exact request body. Verification itself lives
//! behind the `RequestAuthenticator` port.

mod claims;
mod digest;
mod errors;

pub use claims::{PayloadClaim, SignedClaims};
pub use digest::PayloadDigest;
pub use errors::AuthError;
