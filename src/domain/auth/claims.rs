//! Claims carried by a platform-signed request credential.

use serde::{Deserialize, Serialize};

use super::PayloadDigest;
use crate::domain::foundation::ValidationError;

/// Claims decoded from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Payload binding.
    pub data: PayloadClaim,
}

/// The `data` claim: binds the credential to one request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadClaim {
    /// Hex SHA-256 of the request body the issuer signed for.
    #[serde(rename = "SHA256")]
    pub sha256: String,
}

impl SignedClaims {
    /// Builds claims for the given body. Used by issuers and tests.
    pub fn for_body(body: &[u8], exp: i64) -> Self {
        Self {
            exp,
            iat: None,
            iss: None,
            data: PayloadClaim {
                sha256: PayloadDigest::of(body).to_hex(),
            },
        }
    }

    /// Parses the signed digest.
    pub fn payload_digest(&self) -> Result<PayloadDigest, ValidationError> {
        PayloadDigest::from_hex(&self.data.sha256)
    }

    /// True when the signed digest equals the digest of `body`.
    ///
    /// A malformed digest claim never matches.
    pub fn binds(&self, body: &[u8]) -> bool {
        self.payload_digest()
            .map(|signed| signed.matches(&PayloadDigest::of(body)))
            .unwrap_or(false)
    }
}
