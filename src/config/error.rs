//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address")]
    InvalidAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid public key: expected a PEM-encoded RSA public key")]
    InvalidPublicKey,

    #[error("Invalid credential header name")]
    InvalidCredentialHeader,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Platform URL must use HTTPS in production: {0}")]
    PlatformUrlMustBeHttps(&'static str),

    #[error("Event queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Delivery attempts must be between 1 and 10")]
    InvalidDeliveryAttempts,
}
