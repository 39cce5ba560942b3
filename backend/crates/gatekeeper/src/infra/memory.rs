//! In-Memory Rate Limit Store
//!
//! Sharded concurrent map keyed by client key. Suitable for single-instance
//! deployments; a shared cache would replace this for multi-process setups.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use platform::rate_limit::{RateLimitConfig, RateLimitDecision, RateLimitStore};
use std::sync::Arc;

use crate::domain::entities::ClientRateState;

/// DashMap-backed store; each entry lock covers one client's
/// read-prune-check-append sequence without serializing other clients.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitStore {
    clients: Arc<DashMap<String, ClientRateState>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked client entries.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_record(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, Box<dyn std::error::Error + Send + Sync>> {
        let mut entry = self.clients.entry(key.to_string()).or_default();
        Ok(entry.check_and_record(config, now))
    }

    async fn sweep(
        &self,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let before = self.clients.len();
        self.clients.retain(|_, state| !state.is_idle(config, now));
        let removed = (before - self.clients.len()) as u64;
        if removed > 0 {
            tracing::debug!(removed, remaining = self.clients.len(), "swept idle rate limit entries");
        }
        Ok(removed)
    }
}
