//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;

/// Unified application error.
///
/// The standard error type for every crate in the workspace. Carries the
/// classification used for the HTTP status mapping, a client-facing detail
/// message, and an optional source error kept only for server-side logging.
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Report not found");
/// let err = AppError::bad_request("Invalid date range");
/// ```
pub struct AppError {
    kind: ErrorKind,
    /// Client-facing detail; never includes internal identifiers.
    detail: Cow<'static, str>,
    /// Original error, for logging only.
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new error with an explicit kind.
    #[inline]
    pub fn new(kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            source: None,
        }
    }

    /// 400 Bad Request
    #[inline]
    pub fn bad_request(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, detail)
    }

    /// 401 Unauthorized
    #[inline]
    pub fn unauthorized(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, detail)
    }

    /// 403 Forbidden
    #[inline]
    pub fn forbidden(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, detail)
    }

    /// 404 Not Found
    #[inline]
    pub fn not_found(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, detail)
    }

    /// 409 Conflict
    #[inline]
    pub fn conflict(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, detail)
    }

    /// 410 Gone
    #[inline]
    pub fn gone(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Gone, detail)
    }

    /// 422 Unprocessable Entity
    #[inline]
    pub fn unprocessable(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UnprocessableEntity, detail)
    }

    /// 429 Too Many Requests
    #[inline]
    pub fn too_many_requests(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, detail)
    }

    /// 500 Internal Server Error
    #[inline]
    pub fn internal(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, detail)
    }

    /// 503 Service Unavailable
    #[inline]
    pub fn service_unavailable(detail: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, detail)
    }

    /// Attach the original error for server-side logging.
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Error classification.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status code.
    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    /// Client-facing detail message.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Whether this is a 5xx error.
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Whether this is a 4xx error.
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("detail", &self.detail);
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.detail)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

// ============================================================================
// Result extension traits
// ============================================================================

/// Converts `Result<T, E>` into `AppResult<T>` with a chosen classification.
pub trait ResultExt<T, E> {
    /// Wrap the error as an `AppError` of the given kind, keeping the source.
    fn map_app_err(self, kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn map_app_err(self, kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> AppResult<T>
    where
        E: Error + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::new(kind, detail).with_source(e))
    }
}

/// Converts `Option<T>` into `AppResult<T>`.
pub trait OptionExt<T> {
    /// Return an `AppError` of the given kind when `None`.
    fn ok_or_app_err(self, kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> AppResult<T>;

    /// Return 404 Not Found when `None`.
    fn ok_or_not_found(self, detail: impl Into<Cow<'static, str>>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_app_err(self, kind: ErrorKind, detail: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_else(|| AppError::new(kind, detail))
    }

    fn ok_or_not_found(self, detail: impl Into<Cow<'static, str>>) -> AppResult<T> {
        self.ok_or_app_err(ErrorKind::NotFound, detail)
    }
}
