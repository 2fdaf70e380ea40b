//! In-Memory Repository Implementation
//!
//! Keeps every store in one list, keyed by the account's kind. Enforces the
//! same uniqueness rules as the PostgreSQL schema. Used by tests and local
//! runs without a database.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use tokio::sync::RwLock;

use crate::domain::entity::{Account, profile::same_institute};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_kind::AccountKind, account_status::AccountStatus, email::Email,
};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_where<F>(&self, kind: AccountKind, predicate: F) -> Option<Account>
    where
        F: Fn(&Account) -> bool,
    {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.kind() == kind && predicate(a))
            .cloned()
    }
}

fn roll_number(account: &Account) -> Option<&str> {
    account
        .profile
        .academic()
        .map(|academic| academic.roll_number.as_str())
}

fn newest_first(accounts: &mut [Account]) {
    accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;

        let kind = account.kind();
        if accounts
            .iter()
            .any(|a| a.kind() == kind && a.email == account.email)
        {
            return Err(AuthError::EmailTaken);
        }
        if let Some(roll) = roll_number(account) {
            if accounts.iter().any(|a| roll_number(a) == Some(roll)) {
                return Err(AuthError::RollNumberTaken);
            }
        }

        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_id(&self, kind: AccountKind, id: &AccountId) -> AuthResult<Option<Account>> {
        Ok(self.find_where(kind, |a| a.id == *id).await)
    }

    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &Email,
    ) -> AuthResult<Option<Account>> {
        Ok(self.find_where(kind, |a| a.email == *email).await)
    }

    async fn exists_by_email(&self, kind: AccountKind, email: &Email) -> AuthResult<bool> {
        Ok(self.find_by_email(kind, email).await?.is_some())
    }

    async fn roll_number_taken(&self, roll: &str) -> AuthResult<bool> {
        Ok(self
            .accounts
            .read()
            .await
            .iter()
            .any(|a| roll_number(a) == Some(roll)))
    }

    async fn find_by_reset_token(
        &self,
        kind: AccountKind,
        token_hash: &str,
    ) -> AuthResult<Option<Account>> {
        Ok(self
            .find_where(kind, |a| {
                a.password_reset
                    .as_ref()
                    .is_some_and(|digest| digest.token_hash == token_hash)
            })
            .await)
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let mut accounts = self.accounts.write().await;
        if let Some(stored) = accounts
            .iter_mut()
            .find(|a| a.kind() == account.kind() && a.id == account.id)
        {
            *stored = account.clone();
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        kind: AccountKind,
        id: &AccountId,
        target: AccountStatus,
    ) -> AuthResult<u64> {
        let mut accounts = self.accounts.write().await;
        let pending = accounts.iter_mut().find(|a| {
            a.kind() == kind && a.id == *id && a.status == AccountStatus::Pending
        });

        Ok(match pending {
            Some(account) => {
                account.set_status(target);
                1
            }
            None => 0,
        })
    }

    async fn list_by_status(
        &self,
        kind: AccountKind,
        status: AccountStatus,
    ) -> AuthResult<Vec<Account>> {
        let mut found: Vec<Account> = self
            .accounts
            .read()
            .await
            .iter()
            .filter(|a| a.kind() == kind && a.status == status)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn list_students_by_college(&self, college_name: &str) -> AuthResult<Vec<Account>> {
        let mut found: Vec<Account> = self
            .accounts
            .read()
            .await
            .iter()
            .filter(|a| {
                a.profile
                    .academic()
                    .is_some_and(|academic| same_institute(&academic.college_name, college_name))
            })
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn delete(&self, kind: AccountKind, id: &AccountId) -> AuthResult<bool> {
        let mut accounts = self.accounts.write().await;
        let before = accounts.len();
        accounts.retain(|a| !(a.kind() == kind && a.id == *id));
        Ok(accounts.len() < before)
    }

    async fn clear_expired_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut cleared = 0;
        for account in self.accounts.write().await.iter_mut() {
            if account.email_otp.as_ref().is_some_and(|otp| otp.is_expired_at(now)) {
                account.email_otp = None;
                cleared += 1;
            }
            if account
                .password_reset
                .as_ref()
                .is_some_and(|digest| digest.is_expired_at(now))
            {
                account.password_reset = None;
                cleared += 1;
            }
        }
        Ok(cleared)
    }
}
