//! Mock request authenticator for testing.
//!
//! Lets HTTP and wiring tests run without RSA keys.
//!
//! # Example
//!
//! ```ignore
//! use martini_payments::adapters::auth::MockRequestAuthenticator;
//! use martini_payments::domain::auth::AuthError;
//!
//! // Accept any credential in the list, for whatever body arrives
//! let auth = MockRequestAuthenticator::new().with_credential("JWT=good");
//!
//! // Or fail everything with a fixed error
//! let auth = MockRequestAuthenticator::new().with_error(AuthError::Expired);
//! ```

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::{AuthError, SignedClaims};
use crate::ports::RequestAuthenticator;

/// Mock authenticator.
///
/// Known credentials are accepted and bound to whatever body they arrive
/// with. Unknown credentials return `BadSignature`.
#[derive(Debug, Default)]
pub struct MockRequestAuthenticator {
    credentials: RwLock<HashSet<String>>,
    force_error: RwLock<Option<AuthError>>,
    seen_bodies: RwLock<Vec<Vec<u8>>>,
}

impl MockRequestAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(self, credential: impl Into<String>) -> Self {
        self.credentials.write().unwrap().insert(credential.into());
        self
    }

    /// Forces every call to fail with `error`.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Raw bodies passed to `authenticate`, in call order.
    pub fn seen_bodies(&self) -> Vec<Vec<u8>> {
        self.seen_bodies.read().unwrap().clone()
    }
}

#[async_trait]
impl RequestAuthenticator for MockRequestAuthenticator {
    async fn authenticate(
        &self,
        credential: &str,
        raw_body: &[u8],
    ) -> Result<SignedClaims, AuthError> {
        self.seen_bodies.write().unwrap().push(raw_body.to_vec());

        if let Some(error) = *self.force_error.read().unwrap() {
            return Err(error);
        }

        if !self.credentials.read().unwrap().contains(credential) {
            return Err(AuthError::BadSignature);
        }

        Ok(SignedClaims::for_body(raw_body, Utc::now().timestamp() + 300))
    }
}
