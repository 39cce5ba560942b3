//! Domain Entities
//!
//! Per-client rate limiting state and the sliding-window algorithm.

use chrono::{DateTime, Utc};
use platform::rate_limit::{RateLimitConfig, RateLimitDecision};
use std::collections::VecDeque;

/// ClientRateState entity - one entry per rate-limit bucket key
///
/// `recent_calls` holds the timestamps of allowed calls inside the trailing
/// window, oldest first and strictly increasing. Entries older than the
/// window are pruned lazily on each access, never eagerly.
#[derive(Debug, Clone, Default)]
pub struct ClientRateState {
    pub recent_calls: VecDeque<DateTime<Utc>>,
    /// While set and in the future, every request is rejected outright.
    pub blocked_until: Option<DateTime<Utc>>,
}

impl ClientRateState {
    /// Run the sliding-window check at `now`, recording the call if allowed.
    ///
    /// The whole read-prune-check-append sequence must run under one lock
    /// per client; the caller owns that critical section.
    pub fn check_and_record(
        &mut self,
        config: &RateLimitConfig,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let window = config.window_chrono();

        // Active block wins over everything and leaves recent_calls alone.
        if let Some(blocked_until) = self.blocked_until {
            if now < blocked_until {
                let retry_after = (blocked_until - now).num_seconds();
                return RateLimitDecision::rejected(retry_after, blocked_until);
            }
            self.blocked_until = None;
        }

        let cutoff = now - window;
        while let Some(&oldest) = self.recent_calls.front() {
            if oldest <= cutoff {
                self.recent_calls.pop_front();
            } else {
                break;
            }
        }

        if self.recent_calls.len() >= config.max_requests as usize {
            let blocked_until = now + window;
            self.blocked_until = Some(blocked_until);
            return RateLimitDecision::rejected(config.window_secs(), blocked_until);
        }

        self.recent_calls.push_back(now);
        let remaining = config.max_requests - self.recent_calls.len() as u32;
        RateLimitDecision::allowed(remaining, now + window)
    }

    /// Whether this entry can be garbage-collected at `now`.
    ///
    /// Idle means no call newer than twice the window and no active block.
    pub fn is_idle(&self, config: &RateLimitConfig, now: DateTime<Utc>) -> bool {
        let cutoff = now - config.window_chrono() * 2;
        let has_recent = self.recent_calls.back().is_some_and(|&last| last > cutoff);
        let is_blocked = self.blocked_until.is_some_and(|until| until > now);
        !has_recent && !is_blocked
    }
}
