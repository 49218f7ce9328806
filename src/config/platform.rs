//! Platform API configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::events::{DEFAULT_EVENTS_URL, DEFAULT_TOKEN_URL};

/// Platform API configuration (event submission)
///
/// Event delivery is disabled when `app_id` is empty; events are then only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Application id used for the client-credentials grant
    #[serde(default)]
    pub app_id: String,

    /// Application secret
    #[serde(default = "empty_secret")]
    pub app_secret: SecretString,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_events_url")]
    pub events_url: String,

    /// Token lifetime assumed when the token endpoint omits `expires_in`
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Bounded queue between request handlers and the dispatcher
    #[serde(default = "default_queue_capacity")]
    pub dispatch_queue_capacity: usize,

    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,

    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl PlatformConfig {
    /// True when credentials for the platform API are configured.
    pub fn is_enabled(&self) -> bool {
        !self.app_id.trim().is_empty()
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate platform configuration
    ///
    /// In production, requires HTTPS for both platform URLs.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.dispatch_queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if !(1..=10).contains(&self.max_delivery_attempts) {
            return Err(ValidationError::InvalidDeliveryAttempts);
        }
        if !self.is_enabled() {
            return Ok(());
        }

        use secrecy::ExposeSecret;
        if self.app_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PLATFORM__APP_SECRET"));
        }

        if *environment == Environment::Production {
            if !self.token_url.starts_with("https://") {
                return Err(ValidationError::PlatformUrlMustBeHttps("token_url"));
            }
            if !self.events_url.starts_with("https://") {
                return Err(ValidationError::PlatformUrlMustBeHttps("events_url"));
            }
        }

        Ok(())
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: empty_secret(),
            token_url: default_token_url(),
            events_url: default_events_url(),
            token_ttl_secs: default_token_ttl(),
            dispatch_queue_capacity: default_queue_capacity(),
            max_delivery_attempts: default_max_delivery_attempts(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_events_url() -> String {
    DEFAULT_EVENTS_URL.to_string()
}

fn default_token_ttl() -> u64 {
    300
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_max_delivery_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> PlatformConfig {
        PlatformConfig {
            app_id: "app".to_string(),
            app_secret: SecretString::new("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_platform_config_defaults() {
        let config = PlatformConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.dispatch_queue_capacity, 1024);
        assert_eq!(config.retry_backoff(), Duration::from_millis(500));
    }

    #[test]
    fn test_disabled_config_is_valid() {
        assert!(PlatformConfig::default().validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_validation_missing_secret() {
        let config = PlatformConfig {
            app_id: "app".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("PLATFORM__APP_SECRET"))
        );
    }

    #[test]
    fn test_validation_zero_queue_capacity() {
        let config = PlatformConfig {
            dispatch_queue_capacity: 0,
            ..enabled()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidQueueCapacity)
        );
    }

    #[test]
    fn test_validation_attempts_out_of_range() {
        let config = PlatformConfig {
            max_delivery_attempts: 0,
            ..enabled()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_production_requires_https() {
        let config = PlatformConfig {
            events_url: "http://localhost:9000/events".to_string(),
            ..enabled()
        };
        // Allowed in development
        assert!(config.validate(&Environment::Development).is_ok());
        // Rejected in production
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::PlatformUrlMustBeHttps("events_url"))
        );
    }
}
