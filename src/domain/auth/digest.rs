//! SHA-256 payload digests binding a credential to one exact request body.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::domain::foundation::ValidationError;

/// SHA-256 digest of a request body.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadDigest([u8; 32]);

impl PayloadDigest {
    /// Digests the given bytes exactly as received.
    pub fn of(body: &[u8]) -> Self {
        Self(Sha256::digest(body).into())
    }

    /// Parses a hex-encoded digest (either case).
    pub fn from_hex(encoded: &str) -> Result<Self, ValidationError> {
        let bytes = hex::decode(encoded.trim())
            .map_err(|e| ValidationError::invalid_format("SHA256", e.to_string()))?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| {
            ValidationError::invalid_format("SHA256", "expected 32 bytes")
        })?;
        Ok(Self(bytes))
    }

    /// Lowercase hex encoding, as issuers put it in the `data.SHA256` claim.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Constant-time equality.
    pub fn matches(&self, other: &PayloadDigest) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl std::fmt::Debug for PayloadDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PayloadDigest").field(&self.to_hex()).finish()
    }
}
