//! Platform Infrastructure
//!
//! Cross-cutting HTTP utilities shared by the feature crates:
//! - `client` - client identification from request metadata
//! - `rate_limit` - rate limiting abstractions

pub mod client;
pub mod rate_limit;
