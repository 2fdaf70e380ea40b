//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};

use super::kind::ErrorKind;

/// Unified application error
///
/// Every crate converts its own error enum into this type right before it
/// is written to the wire. Built with a small builder API.
///
/// ## Fields
/// * `kind` - classification, decides the HTTP status
/// * `message` - human readable message, rendered as `message`
/// * `action` - optional hint telling the user what to do next
/// * `details` - extra top-level fields merged into the JSON body
///   (e.g. `requiresApproval`, `userId`, `errors`)
/// * `source` - wrapped cause, for logs only
///
/// ## Examples
/// ```rust
/// use kernel::error::app_error::AppError;
///
/// let err = AppError::forbidden("Your account is pending approval")
///     .with_detail("requiresApproval", true)
///     .with_detail("userId", "42");
/// assert_eq!(err.status_code(), 403);
/// assert_eq!(err.details()["requiresApproval"], true);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    action: Option<Cow<'static, str>>,
    details: Map<String, Value>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// `Result<T, AppError>`
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            details: Map::new(),
            source: None,
        }
    }

    /// 400 ValidationError
    #[inline]
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// 401 AuthenticationError
    #[inline]
    pub fn unauthenticated(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// 403 AuthorizationError
    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// 404 NotFoundError
    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// ConflictError (rendered as 400)
    #[inline]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// 500 ServerError
    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Server, message)
    }

    /// 503
    #[inline]
    pub fn unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    #[inline]
    pub fn with_action(mut self, action: impl Into<Cow<'static, str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Add a top-level field to the JSON error body.
    ///
    /// `success`, `error` and `message` are reserved and always win.
    #[inline]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    #[inline]
    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// JSON body sent to clients.
    ///
    /// Server errors never leak their message beyond a generic text; the
    /// real cause stays in the logs.
    pub fn to_body(&self) -> Value {
        let mut body = self.details.clone();
        let message = if self.is_server_error() {
            "Server error".to_string()
        } else {
            self.message.to_string()
        };
        if let Some(action) = &self.action {
            body.insert("action".to_string(), Value::from(action.as_ref()));
        }
        body.insert("success".to_string(), Value::Bool(false));
        body.insert("error".to_string(), Value::from(self.kind.as_str()));
        body.insert("message".to_string(), Value::from(message));
        Value::Object(body)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(action) = &self.action {
            builder.field("action", action);
        }
        if !self.details.is_empty() {
            builder.field("details", &self.details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(action) = &self.action {
            write!(f, " (Action: {})", action)?;
        }
        Ok(())
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
