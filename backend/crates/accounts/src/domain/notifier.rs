//! Outbound Email
//!
//! Delivery is an external collaborator; the application layer decides
//! whether a failure aborts the request.

use thiserror::Error;

use crate::domain::value_object::email::Email;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to deliver email: {0}")]
    Delivery(String),
}

#[trait_variant::make(EmailNotifier: Send)]
pub trait LocalEmailNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        name: &str,
        code: &str,
    ) -> Result<(), NotifyError>;

    async fn send_password_reset(&self, to: &Email, reset_link: &str) -> Result<(), NotifyError>;
}
