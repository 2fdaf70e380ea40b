//! Account Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Account-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// One rejected input field, rendered in `errors: [...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    // ------------------------------------------------------------------
    // 400
    // ------------------------------------------------------------------
    /// One or more request fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists with this email")]
    EmailTaken,

    #[error("Roll number already registered")]
    RollNumberTaken,

    #[error("Email is already verified")]
    AlreadyVerified,

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("OTP has expired. Please request a new one")]
    OtpExpired,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    /// Approval or rejection hit a record that is no longer pending
    #[error("{0}")]
    AlreadyProcessed(&'static str),

    // ------------------------------------------------------------------
    // 401
    // ------------------------------------------------------------------
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("No token, authorization denied")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    /// Token was valid but its subject no longer exists
    #[error("User not found")]
    SubjectNotFound,

    // ------------------------------------------------------------------
    // 403
    // ------------------------------------------------------------------
    #[error("{}", pending_message(.tpo))]
    PendingApproval { user_id: String, tpo: bool },

    #[error("Your registration has been rejected. Please contact the administrator")]
    RegistrationRejected { user_id: String },

    #[error("Please verify your email before continuing")]
    EmailNotVerified { user_id: String },

    #[error("{0}")]
    Forbidden(&'static str),

    // ------------------------------------------------------------------
    // 404
    // ------------------------------------------------------------------
    #[error("{0}")]
    NotFound(&'static str),

    // ------------------------------------------------------------------
    // 500
    // ------------------------------------------------------------------
    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn pending_message(tpo: &bool) -> &'static str {
    if *tpo {
        "Your TPO account requires superadmin approval. Please wait for approval before logging in"
    } else {
        "Your account is pending approval. Please wait for an administrator to approve it"
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::InvalidInput(_)
            | AuthError::InvalidOtp
            | AuthError::OtpExpired
            | AuthError::InvalidResetToken => ErrorKind::Validation,
            AuthError::EmailTaken
            | AuthError::RollNumberTaken
            | AuthError::AlreadyVerified
            | AuthError::AlreadyProcessed(_) => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::IncorrectPassword
            | AuthError::MissingToken
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::SubjectNotFound => ErrorKind::Authentication,
            AuthError::PendingApproval { .. }
            | AuthError::RegistrationRejected { .. }
            | AuthError::EmailNotVerified { .. }
            | AuthError::Forbidden(_) => ErrorKind::Authorization,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::EmailDelivery(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::Server
            }
        }
    }

    /// Convert to AppError, attaching the flags clients route on
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::Validation(errors) => err.with_detail(
                "errors",
                serde_json::to_value(errors).unwrap_or_default(),
            ),
            AuthError::PendingApproval { user_id, .. } => err
                .with_detail("requiresApproval", true)
                .with_detail("userId", user_id.as_str()),
            AuthError::RegistrationRejected { user_id } => err
                .with_detail("registrationRejected", true)
                .with_detail("userId", user_id.as_str()),
            AuthError::EmailNotVerified { user_id } => err
                .with_detail("requiresVerification", true)
                .with_detail("userId", user_id.as_str()),
            AuthError::OtpExpired => err.with_action("Request a new verification code"),
            AuthError::TokenExpired => err.with_action("Please log in again"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AuthError::EmailDelivery(msg) => {
                tracing::error!(message = %msg, "Email delivery failed");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::TokenInvalid => {
                tracing::warn!("Rejected request with invalid token");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AuthError::InvalidInput(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
