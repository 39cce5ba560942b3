//! Application Configuration

use platform::rate_limit::RateLimitConfig;
use std::time::Duration;

/// Gatekeeper configuration
#[derive(Debug, Clone)]
pub struct GatekeeperConfig {
    /// Sliding-window limit applied per client key
    pub rate_limit: RateLimitConfig,
    /// Paths that bypass the limiter and the identity denylist
    pub exempt_paths: Vec<String>,
    /// Lowercase substrings rejected in the User-Agent header
    pub denied_user_agents: Vec<String>,
    /// How much of a request body is scanned for signatures
    pub max_inspected_body_bytes: usize,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            exempt_paths: vec!["/health".to_string(), "/metrics".to_string()],
            denied_user_agents: vec![
                "curl".to_string(),
                "wget".to_string(),
                "python-requests".to_string(),
                "bot".to_string(),
                "crawler".to_string(),
                "spider".to_string(),
            ],
            max_inspected_body_bytes: 1024 * 1024,
        }
    }
}

impl GatekeeperConfig {
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|exempt| exempt == path)
    }

    /// Interval for the idle-client sweep (5x the window).
    pub fn sweep_interval(&self) -> Duration {
        self.rate_limit.window * 5
    }
}
