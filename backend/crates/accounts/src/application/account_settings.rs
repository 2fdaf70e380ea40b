//! Account Settings Use Case
//!
//! Password change and self-service deletion for a signed-in account.
//! Both require the current password.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::password::{PasswordHash, RawPassword};
use crate::error::{AuthError, AuthResult, FieldError};

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct AccountSettingsUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AccountSettingsUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn change_password(
        &self,
        current: &Account,
        input: ChangePasswordInput,
    ) -> AuthResult<()> {
        let mut account = self.reload(current).await?;

        let current_password = RawPassword::for_comparison(input.current_password);
        if !account.password_hash.verify(&current_password) {
            return Err(AuthError::IncorrectPassword);
        }

        let new_password = RawPassword::new(input.new_password).map_err(|e| {
            AuthError::Validation(vec![FieldError::new("newPassword", e.message())])
        })?;

        let password_hash = PasswordHash::from_raw(&new_password, self.config.bcrypt_cost)?;
        account.change_password(password_hash);
        self.repo.update(&account).await?;

        tracing::info!(user_id = %account.id, "Password changed");

        Ok(())
    }

    pub async fn delete_account(&self, current: &Account, password: String) -> AuthResult<()> {
        let account = self.reload(current).await?;

        if !account.password_hash.verify(&RawPassword::for_comparison(password)) {
            return Err(AuthError::IncorrectPassword);
        }

        if !self.repo.delete(account.kind(), &account.id).await? {
            return Err(AuthError::NotFound("User not found"));
        }

        tracing::info!(user_id = %account.id, kind = %account.kind(), "Account deleted");

        Ok(())
    }

    /// Fresh copy from the account's own store
    async fn reload(&self, current: &Account) -> AuthResult<Account> {
        self.repo
            .find_by_id(current.kind(), &current.id)
            .await?
            .ok_or(AuthError::NotFound("User not found"))
    }
}
