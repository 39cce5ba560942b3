//! Report Error Types
//!
//! Report-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::json;
use thiserror::Error;

/// Report-specific result type alias
pub type ReportResult<T> = Result<T, ReportError>;

/// Report-specific error variants
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report does not exist or belongs to someone else
    #[error("Report not found")]
    NotFound,

    /// Report exists but is not in a downloadable state
    #[error("Report is not available for download")]
    NotDownloadable,

    /// Request payload failed validation
    #[error("Invalid report request: {0}")]
    Validation(String),

    /// Caller identity missing or malformed
    #[error("Missing or invalid owner credentials")]
    Unauthorized,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReportError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::NotFound => StatusCode::NOT_FOUND,
            ReportError::NotDownloadable => StatusCode::BAD_REQUEST,
            ReportError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportError::Unauthorized => StatusCode::UNAUTHORIZED,
            ReportError::Database(_) | ReportError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::NotFound => ErrorKind::NotFound,
            ReportError::NotDownloadable => ErrorKind::BadRequest,
            ReportError::Validation(_) => ErrorKind::UnprocessableEntity,
            ReportError::Unauthorized => ErrorKind::Unauthorized,
            ReportError::Database(_) | ReportError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            ReportError::Database(e) => {
                tracing::error!(error = %e, "report database error");
            }
            ReportError::Internal(msg) => {
                tracing::error!(message = %msg, "report internal error");
            }
            _ => {
                tracing::debug!(error = %self, "report request error");
            }
        }
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        AppError::new(kind, message)
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        // Server-side variants keep their detail out of the response
        let detail = match &self {
            ReportError::Database(_) | ReportError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({
            "error": self.kind().as_str(),
            "detail": detail,
        });
        (status, Json(body)).into_response()
    }
}
