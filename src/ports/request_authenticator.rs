//! RequestAuthenticator port - verifies platform-signed requests.
//!
//! A credential is only trusted for the exact body it was issued for, so
//! implementations receive the raw bytes before any parsing happens.

use async_trait::async_trait;

use crate::domain::auth::{AuthError, SignedClaims};

/// Verifies that a request was signed by the platform.
///
/// # Contract
///
/// Implementations check, in order, and stop at the first failure:
/// 1. the signature against the trusted key (`AuthError::BadSignature`)
/// 2. the `exp` claim against the current time (`AuthError::Expired`)
/// 3. the `data.SHA256` claim against the raw body (`AuthError::BodyMismatch`)
///
/// No side effects besides logging.
#[async_trait]
pub trait RequestAuthenticator: Send + Sync {
    /// Verify `credential` (with or without its `JWT=` prefix) for `raw_body`.
    async fn authenticate(
        &self,
        credential: &str,
        raw_body: &[u8],
    ) -> Result<SignedClaims, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn RequestAuthenticator) {}

    struct RejectAll;

    #[async_trait]
    impl RequestAuthenticator for RejectAll {
        async fn authenticate(&self, _: &str, _: &[u8]) -> Result<SignedClaims, AuthError> {
            Err(AuthError::BadSignature)
        }
    }

    #[tokio::test]
    async fn authenticator_is_usable_as_trait_object() {
        let auth: Box<dyn RequestAuthenticator> = Box::new(RejectAll);
        let result = auth.authenticate("JWT=abc", b"{}").await;
        assert_eq!(result.unwrap_err(), AuthError::BadSignature);
    }
}
