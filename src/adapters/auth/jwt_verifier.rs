//! RS256 verifier for platform-signed requests.
//!
//! The platform sends `Digest: JWT=<compact token>`. The token is signed with
//! the app's private key; its `data.SHA256` claim is the hex SHA-256 of the
//! request body it was issued for.
//!
//! # Verification order
//!
//! 1. Signature against the configured public key
//! 2. `exp` against the current time (zero leeway unless configured)
//! 3. `data.SHA256` against the raw body, compared in constant time

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use crate::domain::auth::{AuthError, SignedClaims};
use crate::ports::RequestAuthenticator;

/// Literal prefix the platform puts in front of the token.
pub const DEFAULT_TOKEN_PREFIX: &str = "JWT=";

/// Verifies platform credentials with a fixed RSA public key.
#[derive(Clone)]
pub struct JwtRequestVerifier {
    key: DecodingKey,
    token_prefix: String,
    leeway_secs: u64,
}

impl JwtRequestVerifier {
    /// Builds a verifier from a PEM public key (`BEGIN PUBLIC KEY` or
    /// `BEGIN RSA PUBLIC KEY`).
    pub fn from_rsa_pem(pem: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        Ok(Self {
            key: DecodingKey::from_rsa_pem(pem.as_bytes())?,
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            leeway_secs: 0,
        })
    }

    pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    /// Clock skew tolerated on `exp`.
    pub fn with_leeway(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    fn strip_prefix<'a>(&self, credential: &'a str) -> &'a str {
        let credential = credential.trim();
        if self.token_prefix.is_empty() {
            return credential;
        }
        credential
            .strip_prefix(self.token_prefix.as_str())
            .unwrap_or(credential)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }

    fn verify_token(&self, token: &str) -> Result<SignedClaims, AuthError> {
        decode::<SignedClaims>(token, &self.key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Credential expired");
                    AuthError::Expired
                }
                _ => {
                    tracing::warn!("Credential rejected: {}", e);
                    AuthError::BadSignature
                }
            })
    }
}

#[async_trait]
impl RequestAuthenticator for JwtRequestVerifier {
    async fn authenticate(
        &self,
        credential: &str,
        raw_body: &[u8],
    ) -> Result<SignedClaims, AuthError> {
        let claims = self.verify_token(self.strip_prefix(credential))?;

        if !claims.binds(raw_body) {
            tracing::warn!(body_len = raw_body.len(), "Credential digest does not match body");
            return Err(AuthError::BodyMismatch);
        }

        Ok(claims)
    }
}
