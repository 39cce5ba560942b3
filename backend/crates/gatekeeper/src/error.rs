//! Gatekeeper Error Types
//!
//! Rejections produced by the middleware chain, mapped onto the unified
//! `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::json;
use thiserror::Error;

use crate::domain::value_objects::RejectReason;

/// Why a request was turned away before reaching a handler
#[derive(Debug, Clone, Error)]
pub enum Rejection {
    /// User-Agent matched the denylist
    #[error("Request blocked: user agent not allowed")]
    DeniedUserAgent,

    /// Attack signature in the URL or query string
    #[error("Request blocked: suspicious URL")]
    SuspiciousUrl,

    /// Attack signature in the request body
    #[error("Request blocked: suspicious request body")]
    SuspiciousBody,

    /// Sliding-window limit exceeded
    #[error("Rate limit exceeded, try again later")]
    RateLimited { retry_after_secs: i64 },
}

impl Rejection {
    /// Get the HTTP status code for this rejection
    pub fn status_code(&self) -> StatusCode {
        match self {
            Rejection::DeniedUserAgent => StatusCode::FORBIDDEN,
            Rejection::SuspiciousUrl | Rejection::SuspiciousBody => StatusCode::BAD_REQUEST,
            Rejection::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Get the ErrorKind for this rejection
    pub fn kind(&self) -> ErrorKind {
        match self {
            Rejection::DeniedUserAgent => ErrorKind::Forbidden,
            Rejection::SuspiciousUrl | Rejection::SuspiciousBody => ErrorKind::BadRequest,
            Rejection::RateLimited { .. } => ErrorKind::TooManyRequests,
        }
    }

    fn log(&self) {
        match self {
            Rejection::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "request rate limited");
            }
            _ => {
                tracing::warn!(rejection = %self, "request blocked by security filter");
            }
        }
    }
}

impl From<RejectReason> for Rejection {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::DeniedUserAgent => Rejection::DeniedUserAgent,
            RejectReason::SuspiciousUrl => Rejection::SuspiciousUrl,
            RejectReason::SuspiciousBody => Rejection::SuspiciousBody,
        }
    }
}

impl From<Rejection> for AppError {
    fn from(err: Rejection) -> Self {
        AppError::new(err.kind(), err.to_string())
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let mut body = json!({
            "error": self.kind().as_str(),
            "detail": self.to_string(),
        });
        if let Rejection::RateLimited { retry_after_secs } = &self {
            body["retry_after"] = json!(retry_after_secs);
        }

        let mut response = (status, Json(body)).into_response();
        if let Rejection::RateLimited { retry_after_secs } = self
            && let Ok(value) = retry_after_secs.to_string().parse()
        {
            response.headers_mut().insert(http::header::RETRY_AFTER, value);
        }
        response
    }
}
