//! Approval Use Case
//!
//! Operator moves a pending registration to active or rejected. The record
//! can sit in any of the approvable stores, which are searched in
//! [`APPROVAL_ORDER`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use serde::Serialize;

use crate::domain::directory::{self, APPROVAL_ORDER};
use crate::domain::entity::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{account_kind::AccountKind, account_status::AccountStatus, role::Role};
use crate::error::{AuthError, AuthResult};

/// Operator decision on a pending registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn target(self) -> AccountStatus {
        match self {
            Decision::Approve => AccountStatus::Active,
            Decision::Reject => AccountStatus::Rejected,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Decision::Approve => "User approved successfully",
            Decision::Reject => "User rejected successfully",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkApproveOutput {
    pub requested: usize,
    pub modified: u64,
}

/// One row of the pending-registrations listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistration {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub source: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for PendingRegistration {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str().to_string(),
            role: account.role(),
            name: account.profile.display_name().to_string(),
            source: account.kind().to_string(),
            is_verified: account.is_verified,
            created_at: account.created_at,
        }
    }
}

pub struct ApprovalUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> ApprovalUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Apply `decision` to the registration `id` on behalf of `actor`
    pub async fn decide(&self, actor: &Account, id: &str, decision: Decision) -> AuthResult<()> {
        let id = AccountId::parse_str(id).map_err(|_| AuthError::NotFound("User not found"))?;

        let target = directory::find_by_id(self.repo.as_ref(), &APPROVAL_ORDER, &id)
            .await?
            .ok_or(AuthError::NotFound("User not found"))?;

        if target.role() == Role::Tpo && !actor.role().is_super_admin() {
            return Err(AuthError::Forbidden(
                "Only the superadmin can approve or reject TPO registrations",
            ));
        }

        let modified = self
            .repo
            .transition_status(target.kind(), &target.id, decision.target())
            .await?;

        if modified == 0 {
            return Err(AuthError::AlreadyProcessed(match target.status {
                AccountStatus::Active => "User is already approved",
                AccountStatus::Rejected => "User is already rejected",
                AccountStatus::Pending => "User registration has already been processed",
            }));
        }

        tracing::info!(
            user_id = %target.id,
            kind = %target.kind(),
            actor = %actor.id,
            decision = ?decision,
            "Registration decided"
        );

        Ok(())
    }

    pub async fn approve(&self, actor: &Account, id: &str) -> AuthResult<()> {
        self.decide(actor, id, Decision::Approve).await
    }

    pub async fn reject(&self, actor: &Account, id: &str) -> AuthResult<()> {
        self.decide(actor, id, Decision::Reject).await
    }

    /// Approve every id independently; failures are logged and skipped
    pub async fn bulk_approve(&self, actor: &Account, ids: &[String]) -> BulkApproveOutput {
        let mut modified = 0;
        for id in ids {
            match self.approve(actor, id).await {
                Ok(()) => modified += 1,
                Err(e) => tracing::warn!(user_id = %id, error = %e, "Bulk approval skipped a record"),
            }
        }
        BulkApproveOutput {
            requested: ids.len(),
            modified,
        }
    }

    /// Pending registrations from every approvable store, newest first
    pub async fn pending(&self) -> AuthResult<Vec<PendingRegistration>> {
        let mut items = Vec::new();
        for kind in [
            AccountKind::Legacy,
            AccountKind::Tpo,
            AccountKind::Company,
            AccountKind::Student,
        ] {
            let accounts = self.repo.list_by_status(kind, AccountStatus::Pending).await?;
            items.extend(accounts.iter().map(PendingRegistration::from));
        }
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}
