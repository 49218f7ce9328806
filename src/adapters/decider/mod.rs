//! Authorization decider adapters.
//!
//! - `RandomAuthorizationDecider` - picks approved, declined or pending uniformly
//! - `FixedAuthorizationDecider` - always returns one outcome (tests, demos)

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rand::Rng;

use crate::domain::ledger::AuthorizationOutcome;
use crate::ports::{AuthorizationDecider, AuthorizationRequest, DeciderError};

/// Stub processor: each outcome with equal probability.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAuthorizationDecider;

impl RandomAuthorizationDecider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthorizationDecider for RandomAuthorizationDecider {
    async fn decide(
        &self,
        request: &AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, DeciderError> {
        let outcome = match rand::thread_rng().gen_range(0..3) {
            0 => AuthorizationOutcome::Approved,
            1 => AuthorizationOutcome::declined(),
            _ => AuthorizationOutcome::Pending,
        };
        tracing::debug!(
            wix_transaction_id = %request.external_transaction_id,
            status = %outcome.status(),
            "Random authorization outcome"
        );
        Ok(outcome)
    }
}

/// Returns the same outcome every time and counts calls.
#[derive(Debug)]
pub struct FixedAuthorizationDecider {
    outcome: Result<AuthorizationOutcome, DeciderError>,
    calls: AtomicUsize,
}

impl FixedAuthorizationDecider {
    pub fn new(outcome: AuthorizationOutcome) -> Self {
        Self {
            outcome: Ok(outcome),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(DeciderError(message.into())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `decide` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationDecider for FixedAuthorizationDecider {
    async fn decide(
        &self,
        _request: &AuthorizationRequest,
    ) -> Result<AuthorizationOutcome, DeciderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}
