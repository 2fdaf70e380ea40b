//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum. The variants follow the error taxonomy
//! shared by every route of the placement API, and each one maps onto a
//! single HTTP status code.

use serde::Serialize;

/// Error classification
///
/// ## Notes
/// * `Conflict` deliberately answers with 400: duplicate registrations,
///   already verified emails and already processed approvals are reported to
///   clients as bad requests, not 409s.
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.as_str(), "NotFoundError");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Input failed validation (field level messages)
    Validation,
    /// 401 - Missing, invalid or expired credentials
    Authentication,
    /// 403 - Authenticated but not allowed (role, status, unverified email)
    Authorization,
    /// 404 - Unresolvable id or email
    NotFound,
    /// 400 - Business rule conflict with the current state
    Conflict,
    /// 429 - Too many requests
    TooManyRequests,
    /// 500 - Unexpected failure
    Server,
    /// 503 - A dependency (database, mail relay) is unavailable
    Unavailable,
}

impl ErrorKind {
    /// HTTP status code for this kind
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Validation.status_code(), 400);
    /// assert_eq!(ErrorKind::Conflict.status_code(), 400);
    /// ```
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Authentication => 401,
            ErrorKind::Authorization => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 400,
            ErrorKind::TooManyRequests => 429,
            ErrorKind::Server => 500,
            ErrorKind::Unavailable => 503,
        }
    }

    /// Stable name exposed in error bodies as `error`
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Authentication => "AuthenticationError",
            ErrorKind::Authorization => "AuthorizationError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::TooManyRequests => "TooManyRequestsError",
            ErrorKind::Server => "ServerError",
            ErrorKind::Unavailable => "ServiceUnavailableError",
        }
    }

    /// 5xx errors, which must be logged
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// 4xx errors
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
