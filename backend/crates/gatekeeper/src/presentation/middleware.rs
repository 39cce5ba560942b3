//! Gatekeeper Middleware
//!
//! The two middleware layers of the request pipeline. `security_filter` is
//! the outermost layer; `rate_limit` runs after it and before the handlers.

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use platform::client::extract_client_key;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;
use std::time::Instant;

use crate::application::config::GatekeeperConfig;
use crate::domain::services::RequestInspector;
use crate::domain::value_objects::SecurityDecision;
use crate::error::Rejection;

/// Middleware state shared by both layers
#[derive(Clone)]
pub struct GatekeeperState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub inspector: Arc<RequestInspector>,
    pub config: Arc<GatekeeperConfig>,
}

impl<S> GatekeeperState<S>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    pub fn new(store: S, config: GatekeeperConfig) -> Self {
        let inspector = RequestInspector::new(&config.denied_user_agents);
        Self {
            store: Arc::new(store),
            inspector: Arc::new(inspector),
            config: Arc::new(config),
        }
    }
}

/// Middleware that screens requests before anything else runs
///
/// Checks the user-agent denylist and the URL signatures, buffers and scans
/// mutating bodies, then decorates the response with security headers and a
/// Server-Timing entry.
pub async fn security_filter<S>(
    state: GatekeeperState<S>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    let started = Instant::now();

    let exempt = state.config.is_exempt(req.uri().path());
    let full_url = req.uri().to_string();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let decision = state.inspector.inspect_request(&full_url, user_agent, exempt);
    if let SecurityDecision::Reject(reason) = decision {
        return Err(Rejection::from(reason).into_response());
    }

    let is_mutating = req.method() == Method::POST
        || req.method() == Method::PUT
        || req.method() == Method::PATCH;

    let req = if is_mutating {
        let (parts, body) = req.into_parts();
        // Unreadable bodies are treated as empty rather than rejected
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .unwrap_or_default();

        let inspected = &bytes[..bytes.len().min(state.config.max_inspected_body_bytes)];
        let text = String::from_utf8_lossy(inspected);
        if let SecurityDecision::Reject(reason) = state.inspector.inspect_body(&text) {
            return Err(Rejection::from(reason).into_response());
        }

        Request::from_parts(parts, Body::from(bytes))
    } else {
        req
    };

    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("x-xss-protection", HeaderValue::from_static("1; mode=block"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "permissions-policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    headers.remove(header::SERVER);

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("total;dur={elapsed_ms:.1}")) {
        headers.insert("server-timing", value);
    }

    Ok(response)
}

/// Middleware that enforces the per-client sliding-window limit
///
/// Exempt paths bypass the limiter entirely. A store failure lets the
/// request through; availability beats enforcement here.
pub async fn rate_limit<S>(
    state: GatekeeperState<S>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: RateLimitStore + Clone + Send + Sync + 'static,
{
    if state.config.is_exempt(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let direct_ip = req
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip());
    let key = extract_client_key(req.headers(), direct_ip);

    let decision = match state
        .store
        .check_and_record(&key, &state.config.rate_limit, Utc::now())
        .await
    {
        Ok(decision) => decision,
        Err(e) => {
            tracing::warn!(error = %e, "rate limit store unavailable, failing open");
            return Ok(next.run(req).await);
        }
    };

    if !decision.allowed {
        return Err(Rejection::RateLimited {
            retry_after_secs: decision.retry_after_secs,
        }
        .into_response());
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.rate_limit.max_requests.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.reset_at.timestamp().to_string()) {
        headers.insert("x-ratelimit-reset", value);
    }

    Ok(response)
}
