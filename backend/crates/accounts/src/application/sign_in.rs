//! Sign In Use Case
//!
//! Checks credentials, approval status and email verification, then issues
//! a session token.

use std::fmt;
use std::sync::{Arc, OnceLock};

use platform::jwt;

use crate::application::config::AuthConfig;
use crate::domain::directory;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_status::AccountStatus,
    email::Email,
    password::{PasswordHash, RawPassword},
    role::Role,
};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub struct SignInOutput {
    /// Session token, sent both as cookie and in the body
    pub token: String,
    pub account: Account,
}

impl fmt::Debug for SignInOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInOutput")
            .field("token", &"[REDACTED]")
            .field("account", &self.account.id)
            .finish()
    }
}

pub struct SignInUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Same error for unknown email and wrong password
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = RawPassword::for_comparison(input.password);

        let Some(mut account) = directory::find_by_email(self.repo.as_ref(), &email).await?
        else {
            // Unknown emails still pay for one bcrypt check
            if let Some(decoy) = decoy_hash(self.config.bcrypt_cost) {
                decoy.verify(&password);
            }
            return Err(AuthError::InvalidCredentials);
        };

        if !account.password_hash.verify(&password) {
            return Err(AuthError::InvalidCredentials);
        }

        check_login_allowed(&account)?;

        account.record_login();
        self.repo.update(&account).await?;

        let token = jwt::issue(
            &self.config.jwt_secret,
            &account.id.to_string(),
            self.config.token_ttl(),
        )
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(user_id = %account.id, role = %account.role(), "User signed in");

        Ok(SignInOutput { token, account })
    }
}

fn decoy_hash(cost: u32) -> Option<&'static PasswordHash> {
    static DECOY: OnceLock<Option<PasswordHash>> = OnceLock::new();
    DECOY
        .get_or_init(|| {
            let raw = RawPassword::new(platform::crypto::random_hex(16)).ok()?;
            PasswordHash::from_raw(&raw, cost).ok()
        })
        .as_ref()
}

/// superadmin, or approved and with a confirmed email
fn check_login_allowed(account: &Account) -> AuthResult<()> {
    let role = account.role();
    if role == Role::SuperAdmin {
        return Ok(());
    }

    let user_id = account.id.to_string();
    match account.status {
        AccountStatus::Active => {}
        AccountStatus::Rejected => return Err(AuthError::RegistrationRejected { user_id }),
        AccountStatus::Pending => {
            return Err(AuthError::PendingApproval {
                user_id,
                tpo: role == Role::Tpo,
            });
        }
    }

    if !account.has_confirmed_email() {
        return Err(AuthError::EmailNotVerified { user_id });
    }

    Ok(())
}
