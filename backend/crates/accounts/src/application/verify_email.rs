//! Email Verification Use Case
//!
//! Consumes the six-digit code sent at registration, or issues a new one.
//! Verification never touches the approval status.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::domain::directory::{self, AUTH_LOOKUP_ORDER};
use crate::domain::entity::Account;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email,
    one_time_code::{OneTimeCode, SubmittedCode},
};
use crate::error::{AuthError, AuthResult};

pub struct VerifyEmailUseCase<R, N>
where
    R: AccountRepository,
    N: EmailNotifier,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<R, N> VerifyEmailUseCase<R, N>
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

    /// Check `otp` for `user_id` and mark the email verified
    pub async fn verify(&self, user_id: &str, otp: &str) -> AuthResult<Account> {
        let submitted = SubmittedCode::parse(otp)?;
        let id = AccountId::parse_str(user_id).map_err(|_| AuthError::NotFound("User not found"))?;

        let mut account = directory::find_by_id(self.repo.as_ref(), &AUTH_LOOKUP_ORDER, &id)
            .await?
            .ok_or(AuthError::NotFound("User not found"))?;

        if account.is_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let stored = account.email_otp.as_ref().ok_or(AuthError::InvalidOtp)?;
        if stored.is_expired_at(Utc::now()) {
            return Err(AuthError::OtpExpired);
        }
        if !stored.matches(&submitted) {
            tracing::debug!(user_id = %account.id, "Verification code mismatch");
            return Err(AuthError::InvalidOtp);
        }

        account.mark_verified();
        self.repo.update(&account).await?;

        tracing::info!(user_id = %account.id, role = %account.role(), "Email verified");

        Ok(account)
    }

    /// Issue and send a fresh code to an unverified account
    pub async fn resend(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;

        let mut account = directory::find_by_email(self.repo.as_ref(), &email)
            .await?
            .ok_or(AuthError::NotFound("No account found with this email"))?;

        if account.is_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let otp = OneTimeCode::generate(self.config.otp_ttl());
        account.issue_otp(otp.clone());
        self.repo.update(&account).await?;

        tracing::info!(user_id = %account.id, "Verification code reissued");

        let sent = self
            .notifier
            .send_verification_code(&account.email, account.profile.display_name(), otp.code())
            .await;
        self.config.email_delivery.settle(sent, "verification code")
    }
}
