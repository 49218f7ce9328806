//! Authentication adapters.
//!
//! Implementations of the `RequestAuthenticator` port:
//!
//! - `jwt_verifier` - RS256 credentials bound to the request body
//! - `mock` - Test implementation that needs no keys

mod jwt_verifier;
mod mock;

pub use jwt_verifier::{JwtRequestVerifier, DEFAULT_TOKEN_PREFIX};
pub use mock::MockRequestAuthenticator;
