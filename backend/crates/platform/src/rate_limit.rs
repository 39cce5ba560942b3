//! Rate Limiting Infrastructure
//!
//! Common rate limiting abstractions. Store implementations live in the
//! feature crates (in-memory for single-instance deployments; a shared
//! cache would back a multi-process deployment).

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_secs(&self) -> i64 {
        self.window.as_secs() as i64
    }

    pub fn window_chrono(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.window_secs())
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when rejected)
    pub remaining: u32,
    /// Seconds until the client may retry (0 when allowed)
    pub retry_after_secs: i64,
    /// When the current window resets
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Allowed decision with the given headroom.
    pub fn allowed(remaining: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after_secs: 0,
            reset_at,
        }
    }

    /// Rejected decision with a retry hint.
    pub fn rejected(retry_after_secs: i64, reset_at: DateTime<Utc>) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after_secs,
            reset_at,
        }
    }
}

/// Trait for rate limit storage backends
///
/// `check_and_record` must treat the read-prune-check-append sequence for a
/// single key as one critical section; different keys must not serialize
/// against each other. Callers are expected to fail open when a store
/// returns an error.
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check the limit for `key` at `now`, recording the call when allowed.
    async fn check_and_record(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, Box<dyn std::error::Error + Send + Sync>>;

    /// Drop idle client entries; returns how many were removed.
    async fn sweep(
        &self,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>>;
}
