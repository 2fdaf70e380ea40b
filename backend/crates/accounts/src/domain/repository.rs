//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer. Every lookup names the store it reads; the
//! cross-store search order is decided in [`crate::domain::directory`].

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::entity::Account;
use crate::domain::value_object::{
    account_kind::AccountKind, account_status::AccountStatus, email::Email,
};
use crate::error::AuthResult;

#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert into the store matching `account.kind()`.
    ///
    /// Fails with `EmailTaken` / `RollNumberTaken` on a uniqueness clash
    /// inside that store.
    async fn create(&self, account: &Account) -> AuthResult<()>;

    async fn find_by_id(&self, kind: AccountKind, id: &AccountId) -> AuthResult<Option<Account>>;

    async fn find_by_email(&self, kind: AccountKind, email: &Email)
    -> AuthResult<Option<Account>>;

    async fn exists_by_email(&self, kind: AccountKind, email: &Email) -> AuthResult<bool>;

    /// Roll number used by a student account or a legacy student record
    async fn roll_number_taken(&self, roll_number: &str) -> AuthResult<bool>;

    /// Lookup by the SHA-256 digest of a reset token
    async fn find_by_reset_token(
        &self,
        kind: AccountKind,
        token_hash: &str,
    ) -> AuthResult<Option<Account>>;

    /// Persist status, verification, codes, password, and login time
    async fn update(&self, account: &Account) -> AuthResult<()>;

    /// Move a pending record to `target`.
    ///
    /// Returns the number of records changed: 0 when the record is missing
    /// or no longer pending.
    async fn transition_status(
        &self,
        kind: AccountKind,
        id: &AccountId,
        target: AccountStatus,
    ) -> AuthResult<u64>;

    async fn list_by_status(
        &self,
        kind: AccountKind,
        status: AccountStatus,
    ) -> AuthResult<Vec<Account>>;

    /// Student accounts and legacy student records of one college,
    /// matched case-insensitively on the trimmed name
    async fn list_students_by_college(&self, college_name: &str) -> AuthResult<Vec<Account>>;

    async fn delete(&self, kind: AccountKind, id: &AccountId) -> AuthResult<bool>;

    /// Drop verification codes and reset tokens that expired before `now`
    async fn clear_expired_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
