//! Password Reset Use Case
//!
//! `forgot` always answers the same way whether or not the email is known.
//! `reset` consumes the emailed token exactly once.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::directory;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email,
    password::{PasswordHash, RawPassword},
    reset_token::ResetToken,
};
use crate::error::{AuthError, AuthResult, FieldError};

pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
    /// Checked only when the client sends it
    pub confirm_password: Option<String>,
}

pub struct PasswordResetUseCase<R, N>
where
    R: AccountRepository,
    N: EmailNotifier,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<R, N> PasswordResetUseCase<R, N>
where
    R: AccountRepository,
    N: EmailNotifier,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    /// Store a reset token for `email` if it belongs to an account and mail
    /// the link.
    pub async fn forgot(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)
            .map_err(|e| AuthError::Validation(vec![FieldError::new("email", e.message())]))?;

        let Some(mut account) = directory::find_by_email(self.repo.as_ref(), &email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let (token, digest) = ResetToken::issue(self.config.reset_token_ttl());
        account.set_password_reset(digest);
        self.repo.update(&account).await?;

        tracing::info!(user_id = %account.id, "Password reset token issued");

        let link = self.config.reset_link(token.as_str());
        let sent = self.notifier.send_password_reset(&account.email, &link).await;
        self.config.email_delivery.settle(sent, "password reset link")
    }

    pub async fn reset(&self, input: ResetPasswordInput) -> AuthResult<()> {
        let ResetPasswordInput {
            token,
            password,
            confirm_password,
        } = input;

        let password = RawPassword::new(password)
            .map_err(|e| AuthError::Validation(vec![FieldError::new("password", e.message())]))?;
        if let Some(confirm) = confirm_password {
            if !password.matches(&RawPassword::for_comparison(confirm)) {
                return Err(AuthError::Validation(vec![FieldError::new(
                    "confirmPassword",
                    "Passwords do not match",
                )]));
            }
        }

        let token = ResetToken::from_submitted(&token);
        let mut account = directory::find_by_reset_token(self.repo.as_ref(), &token.hash())
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let expired = account
            .password_reset
            .as_ref()
            .is_none_or(|digest| digest.is_expired_at(Utc::now()));
        if expired {
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = PasswordHash::from_raw(&password, self.config.bcrypt_cost)?;
        account.change_password(password_hash);
        self.repo.update(&account).await?;

        tracing::info!(user_id = %account.id, "Password reset completed");

        Ok(())
    }
}
