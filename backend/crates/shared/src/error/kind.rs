//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// Error classification, one variant per HTTP status the API can emit.
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.as_str(), "Not Found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - malformed or rejected request
    BadRequest,
    /// 401 - authentication required
    Unauthorized,
    /// 403 - access denied
    Forbidden,
    /// 404 - resource does not exist
    NotFound,
    /// 409 - conflicts with current state
    Conflict,
    /// 410 - resource deleted or expired
    Gone,
    /// 422 - semantically invalid entity
    UnprocessableEntity,
    /// 429 - rate limit exceeded
    TooManyRequests,
    /// 500 - server-side fault
    InternalServerError,
    /// 503 - dependency unavailable
    ServiceUnavailable,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Gone => 410,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::InternalServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Standard reason phrase, used as the `error` field in response bodies.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Gone => "Gone",
            ErrorKind::UnprocessableEntity => "Unprocessable Entity",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
            ErrorKind::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx errors; these should be logged server-side.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx errors.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
