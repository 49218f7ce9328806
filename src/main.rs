//! Martini Payments server binary.
//!
//! Loads configuration from `MARTINI__*` environment variables, wires the
//! adapters together and serves the platform endpoints until Ctrl-C.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use martini_payments::adapters::auth::JwtRequestVerifier;
use martini_payments::adapters::decider::RandomAuthorizationDecider;
use martini_payments::adapters::events::{
    event_queue, DispatcherConfig, LoggingEventSink, PlatformEventSink, PlatformSinkConfig,
};
use martini_payments::adapters::http::{app_router, AuthState, PaymentsAppState};
use martini_payments::adapters::storage::{InMemoryLedgerStore, RedisLedgerStore};
use martini_payments::config::{AppConfig, PlatformConfig, StoreBackend, StoreConfig};
use martini_payments::ports::{EventSink, LedgerStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let addr = config.server.socket_addr()?;

    let store = build_store(&config.store).await?;

    let verifier = JwtRequestVerifier::from_rsa_pem(&config.auth.public_key())?
        .with_token_prefix(config.auth.token_prefix.clone())
        .with_leeway(config.auth.leeway_secs);
    let auth = AuthState::new(Arc::new(verifier))
        .with_credential_header(config.auth.credential_header_name()?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let target = build_delivery_target(&config.platform)?;
    let (queued_sink, dispatcher) = event_queue(
        config.platform.dispatch_queue_capacity,
        target,
        DispatcherConfig::default()
            .with_max_attempts(config.platform.max_delivery_attempts)
            .with_retry_backoff(config.platform.retry_backoff()),
    );
    let dispatcher_task = tokio::spawn(dispatcher.run(shutdown_rx));

    let state = PaymentsAppState::new(
        store,
        Arc::new(RandomAuthorizationDecider::new()),
        Arc::new(queued_sink),
    );
    let app = app_router(state, auth, config.server.request_timeout());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Martini Payments listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Handlers are gone; drain whatever is still queued.
    let _ = shutdown_tx.send(true);
    if let Err(err) = dispatcher_task.await {
        tracing::error!(error = %err, "Event dispatcher task failed");
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn LedgerStore>, BoxError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory ledger store; state is lost on restart");
            Ok(Arc::new(InMemoryLedgerStore::new()))
        }
        StoreBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            let store = RedisLedgerStore::connect(url, &config.key_prefix).await?;
            tracing::info!(prefix = %config.key_prefix, "Connected to Redis ledger store");
            Ok(Arc::new(store))
        }
    }
}

fn build_delivery_target(config: &PlatformConfig) -> Result<Arc<dyn EventSink>, BoxError> {
    if !config.is_enabled() {
        tracing::warn!("Platform credentials not configured; events will only be logged");
        return Ok(Arc::new(LoggingEventSink::new()));
    }

    use secrecy::ExposeSecret;
    let sink_config = PlatformSinkConfig::new(
        config.app_id.clone(),
        config.app_secret.expose_secret().clone(),
    )
    .with_token_url(config.token_url.clone())
    .with_events_url(config.events_url.clone())
    .with_token_ttl(config.token_ttl());

    Ok(Arc::new(PlatformEventSink::new(sink_config)?))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
