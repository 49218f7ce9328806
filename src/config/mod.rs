//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MARTINI` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use martini_payments::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod error;
mod platform;
mod server;
mod store;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use platform::PlatformConfig;
pub use server::{Environment, ServerConfig};
pub use store::{StoreBackend, StoreConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Signed-request verification (platform public key)
    pub auth: AuthConfig,

    /// Platform API used for event submission
    #[serde(default)]
    pub platform: PlatformConfig,

    /// Ledger store backend
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MARTINI` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MARTINI__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `MARTINI__AUTH__PUBLIC_KEY_PEM=...` -> `auth.public_key_pem = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MARTINI")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.platform.validate(&self.server.environment)?;
        self.store.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const PEM: &str = include_str!("../../tests/fixtures/test_verifying_key.pem");

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("MARTINI__AUTH__PUBLIC_KEY_PEM", PEM);
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("MARTINI__AUTH__PUBLIC_KEY_PEM");
        env::remove_var("MARTINI__SERVER__PORT");
        env::remove_var("MARTINI__SERVER__ENVIRONMENT");
        env::remove_var("MARTINI__STORE__BACKEND");
        env::remove_var("MARTINI__STORE__REDIS_URL");
        env::remove_var("MARTINI__PLATFORM__APP_ID");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.auth.public_key(), PEM);
        assert_eq!(config.auth.credential_header, "Digest");
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_validate_minimal_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.platform.is_enabled());
    }

    #[test]
    fn test_missing_public_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MARTINI__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_redis_backend_without_url_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MARTINI__STORE__BACKEND", "redis");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STORE__REDIS_URL"))
        );
    }

    #[test]
    fn test_platform_without_secret_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MARTINI__PLATFORM__APP_ID", "app-id");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.platform.is_enabled());
        assert!(config.validate().is_err());
    }
}
