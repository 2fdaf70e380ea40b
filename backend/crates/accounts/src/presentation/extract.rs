//! Request Extractors

use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;

use crate::error::AuthError;

/// `Json` whose rejection renders as a 400 account error
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct ValidatedJson<T>(pub T);

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::InvalidInput(rejection.body_text())
    }
}
