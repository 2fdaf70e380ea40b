//! Request Gate
//!
//! Resolves a session token to an account and applies the approval and
//! email-verification gates every protected route shares.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::jwt::{self, TokenError};

use crate::application::config::AuthConfig;
use crate::domain::directory::{self, AUTH_LOOKUP_ORDER};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_status::AccountStatus, role::Role};
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, token: Option<&str>) -> AuthResult<Account> {
        let token = token.ok_or(AuthError::MissingToken)?;

        let claims = jwt::verify(&self.config.jwt_secret, token).map_err(|e| match e {
            TokenError::Expired => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;
        let id = AccountId::parse_str(&claims.user_id).map_err(|_| AuthError::TokenInvalid)?;

        let account = directory::find_by_id(self.repo.as_ref(), &AUTH_LOOKUP_ORDER, &id)
            .await?
            .ok_or(AuthError::SubjectNotFound)?;

        check_gates(&account)?;

        Ok(account)
    }
}

fn check_gates(account: &Account) -> AuthResult<()> {
    let role = account.role();

    if role != Role::SuperAdmin && !account.is_active() {
        let user_id = account.id.to_string();
        return Err(match account.status {
            AccountStatus::Rejected => AuthError::RegistrationRejected { user_id },
            _ => AuthError::PendingApproval {
                user_id,
                tpo: role == Role::Tpo,
            },
        });
    }

    if !account.has_confirmed_email() && !role.is_admin() {
        return Err(AuthError::EmailNotVerified {
            user_id: account.id.to_string(),
        });
    }

    Ok(())
}
