//! Authentication configuration

use axum::http::HeaderName;
use serde::Deserialize;

use super::error::ValidationError;

/// Signed-request verification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// PEM-encoded RSA public key of the platform. Literal `\n` sequences are
    /// accepted so the key fits in a single environment variable.
    pub public_key_pem: String,

    /// Header carrying the credential
    #[serde(default = "default_credential_header")]
    pub credential_header: String,

    /// Prefix in front of the token inside the header
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,

    /// Clock skew tolerated on `exp`, in seconds
    #[serde(default)]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// The public key with escaped newlines restored.
    pub fn public_key(&self) -> String {
        self.public_key_pem.replace("\\n", "\n")
    }

    /// The credential header as a typed header name.
    pub fn credential_header_name(&self) -> Result<HeaderName, ValidationError> {
        HeaderName::from_bytes(self.credential_header.to_ascii_lowercase().as_bytes())
            .map_err(|_| ValidationError::InvalidCredentialHeader)
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.public_key_pem.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__PUBLIC_KEY_PEM"));
        }
        if !self.public_key().contains("-----BEGIN") {
            return Err(ValidationError::InvalidPublicKey);
        }
        self.credential_header_name()?;
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_key_pem: String::new(),
            credential_header: default_credential_header(),
            token_prefix: default_token_prefix(),
            leeway_secs: 0,
        }
    }
}

fn default_credential_header() -> String {
    "Digest".to_string()
}

fn default_token_prefix() -> String {
    "JWT=".to_string()
}
