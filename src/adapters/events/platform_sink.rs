//! Platform events adapter.
//!
//! Implements `EventSink` against the platform's provider-events API:
//!
//! 1. Fetch an access token with the client-credentials grant
//!    (`scope=CASHIER.GET_ACCESS`) and cache it until shortly before expiry
//! 2. POST the event envelope with the raw token in `Authorization`
//!
//! # Security
//!
//! - The app secret and cached token are held as `secrecy::SecretString`
//! - A `401` from the events endpoint drops the cached token

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::domain::events::PlatformEvent;
use crate::ports::{DeliveryStatus, EventSink, NotifyError};

pub const DEFAULT_TOKEN_URL: &str = "https://www.wixapis.com/oauth/access";
pub const DEFAULT_EVENTS_URL: &str = "https://www.wixapis.com/payments/v1/provider-platform-events";

/// Scope requested for event submission.
const TOKEN_SCOPE: &str = "CASHIER.GET_ACCESS";

/// Tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;

/// Platform API configuration.
#[derive(Clone)]
pub struct PlatformSinkConfig {
    app_id: String,
    app_secret: SecretString,
    token_url: String,
    events_url: String,
    /// Assumed lifetime when the token response carries no `expires_in`.
    token_ttl: Duration,
    request_timeout: Duration,
}

impl PlatformSinkConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: SecretString::new(app_secret.into()),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            events_url: DEFAULT_EVENTS_URL.to_string(),
            token_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_events_url(mut self, url: impl Into<String>) -> Self {
        self.events_url = url.into();
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    scope: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Sends events to the platform.
pub struct PlatformEventSink {
    config: PlatformSinkConfig,
    http_client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl PlatformEventSink {
    pub fn new(config: PlatformSinkConfig) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
            token: Mutex::new(None),
        })
    }

    /// Returns a cached token or fetches a new one.
    async fn access_token(&self) -> Result<SecretString, NotifyError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    async fn fetch_token(&self) -> Result<CachedToken, NotifyError> {
        tracing::debug!(url = %self.config.token_url, "Requesting platform access token");

        let request = TokenRequest {
            grant_type: "client_credentials",
            scope: TOKEN_SCOPE,
            client_id: &self.config.app_id,
            client_secret: self.config.app_secret.expose_secret(),
        };

        let response = self
            .http_client
            .post(&self.config.token_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotifyError::TokenUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Access token request rejected");
            return Err(NotifyError::TokenUnavailable(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::TokenUnavailable(format!("invalid token response: {}", e)))?;

        let ttl = body
            .expires_in
            .filter(|secs| *secs > 0)
            .unwrap_or(self.config.token_ttl.as_secs() as i64);

        Ok(CachedToken {
            value: SecretString::new(body.access_token),
            expires_at: Utc::now() + chrono::Duration::seconds(ttl),
        })
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }
}

#[async_trait]
impl EventSink for PlatformEventSink {
    async fn notify(&self, event: &PlatformEvent) -> Result<DeliveryStatus, NotifyError> {
        let token = self.access_token().await?;

        let response = self
            .http_client
            .post(&self.config.events_url)
            .header(reqwest::header::AUTHORIZATION, token.expose_secret())
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            return Ok(DeliveryStatus::Delivered(status));
        }

        if status == 401 {
            self.invalidate_token().await;
        }
        let error_text = response.text().await.unwrap_or_default();
        tracing::warn!(status, error = %error_text, "Platform rejected event");
        Err(NotifyError::Rejected(status))
    }
}
