//! Account Directory
//!
//! Accounts are spread over one store per kind. These helpers search the
//! stores in a fixed priority order and return the first match, tagged with
//! the kind it came from.

use kernel::id::AccountId;

use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_kind::AccountKind, email::Email};
use crate::error::AuthResult;

/// Order used to resolve a session subject or a login email
pub const AUTH_LOOKUP_ORDER: [AccountKind; 5] = [
    AccountKind::Student,
    AccountKind::Company,
    AccountKind::Tpo,
    AccountKind::SuperAdmin,
    AccountKind::Legacy,
];

/// Order used by approve/reject
pub const APPROVAL_ORDER: [AccountKind; 4] = [
    AccountKind::Legacy,
    AccountKind::Tpo,
    AccountKind::Company,
    AccountKind::Student,
];

/// Stores that hold student records
pub const STUDENT_STORES: [AccountKind; 2] = [AccountKind::Student, AccountKind::Legacy];

pub async fn find_by_id<R: AccountRepository>(
    repo: &R,
    order: &[AccountKind],
    id: &AccountId,
) -> AuthResult<Option<Account>> {
    for &kind in order {
        if let Some(account) = repo.find_by_id(kind, id).await? {
            return Ok(Some(account));
        }
    }
    Ok(None)
}

pub async fn find_by_email<R: AccountRepository>(
    repo: &R,
    email: &Email,
) -> AuthResult<Option<Account>> {
    for kind in AUTH_LOOKUP_ORDER {
        if let Some(account) = repo.find_by_email(kind, email).await? {
            return Ok(Some(account));
        }
    }
    Ok(None)
}

pub async fn find_by_reset_token<R: AccountRepository>(
    repo: &R,
    token_hash: &str,
) -> AuthResult<Option<Account>> {
    for kind in AUTH_LOOKUP_ORDER {
        if let Some(account) = repo.find_by_reset_token(kind, token_hash).await? {
            return Ok(Some(account));
        }
    }
    Ok(None)
}

/// Emails are unique across every store
pub async fn email_registered<R: AccountRepository>(repo: &R, email: &Email) -> AuthResult<bool> {
    for kind in AUTH_LOOKUP_ORDER {
        if repo.exists_by_email(kind, email).await? {
            return Ok(true);
        }
    }
    Ok(false)
}
