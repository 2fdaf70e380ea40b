//! Superadmin Bootstrap
//!
//! Seeds the platform operator account on startup when none exists for the
//! configured email.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::directory;
use crate::domain::entity::{Account, Profile, SuperAdminProfile};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    email::Email,
    password::{PasswordHash, RawPassword},
};
use crate::error::AuthResult;

pub struct BootstrapInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub struct BootstrapSuperAdminUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> BootstrapSuperAdminUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    /// Returns `true` when an account was created
    pub async fn execute(&self, input: BootstrapInput) -> AuthResult<bool> {
        let email = Email::new(&input.email)?;

        if directory::email_registered(self.repo.as_ref(), &email).await? {
            tracing::debug!("Superadmin email already registered, skipping bootstrap");
            return Ok(false);
        }

        let password = RawPassword::new(input.password)?;
        let password_hash = PasswordHash::from_raw(&password, self.config.bcrypt_cost)?;
        let account = Account::seeded(
            email,
            password_hash,
            Profile::SuperAdmin(SuperAdminProfile { name: input.name }),
        );

        self.repo.create(&account).await?;

        tracing::info!(user_id = %account.id, "Superadmin account created");

        Ok(true)
    }
}
