//! Request Gatekeeper
//!
//! The middleware chain every API request passes through, in fixed order:
//! security filter → rate limiter → handler, with rate-limit headers and
//! security headers applied on the way back out.
//!
//! Clean Architecture structure:
//! - `domain/` - per-client rate state, request inspection rules
//! - `application/` - configuration
//! - `infra/` - rate limit store implementations
//! - `presentation/` - axum middleware
//!
//! ## Security Model
//! - The security filter is stateless; every decision is a pure function of
//!   one request
//! - The rate limiter owns the only shared mutable state (the per-client
//!   map); a store failure fails open, never closed
//! - Health and metrics paths bypass the limiter and the user-agent denylist
//!   so probes cannot be locked out

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GatekeeperConfig;
pub use error::Rejection;
pub use infra::memory::InMemoryRateLimitStore;
pub use presentation::middleware::{GatekeeperState, rate_limit, security_filter};

#[cfg(test)]
mod tests;
