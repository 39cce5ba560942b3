//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Number of raw token bytes used as the per-user bucket key.
///
/// Deliberately weak: the prefix of the raw header value stands in for real
/// token decoding, so distinct tokens sharing a prefix collide into one
/// bucket. Kept as-is until client identification is reworked.
const TOKEN_KEY_LEN: usize = 13;

/// Derive the rate-limit bucket key for a request.
///
/// Prefers the bearer credential (`user:<token prefix>`); falls back to the
/// client IP (`ip:<addr>`). Requests with neither share the `ip:unknown`
/// bucket.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
pub fn extract_client_key(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = auth.strip_prefix("Bearer ") {
            let prefix: String = token.chars().take(TOKEN_KEY_LEN).collect();
            if !prefix.is_empty() {
                return format!("user:{prefix}");
            }
        }
    }

    match extract_client_ip(headers, direct_ip) {
        Some(ip) => format!("ip:{ip}"),
        None => "ip:unknown".to_string(),
    }
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address
///
/// ## Returns
/// The client IP address, or None if not determinable
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // Check X-Forwarded-For header (first IP in the list)
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
