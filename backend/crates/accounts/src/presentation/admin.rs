//! HTTP Handlers for `/api/admin`
//!
//! Mounted behind the request gate and the admin guard.

use axum::Json;
use axum::extract::{Extension, Path, State};

use crate::application::{ApprovalUseCase, Decision};
use crate::domain::entity::Account;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    BulkApproveRequest, BulkApproveResponse, MessageResponse, PendingRegistrationsResponse,
};
use crate::presentation::extract::ValidatedJson;
use crate::presentation::handlers::AccountsState;
use crate::presentation::middleware::CurrentAccount;

/// POST /api/admin/approve-user/{id}
pub async fn approve_user<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(CurrentAccount(actor)): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    decide(state, actor, id, Decision::Approve).await
}

/// POST /api/admin/reject-user/{id}
pub async fn reject_user<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(CurrentAccount(actor)): Extension<CurrentAccount>,
    Path(id): Path<String>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    decide(state, actor, id, Decision::Reject).await
}

async fn decide<R, N>(
    state: AccountsState<R, N>,
    actor: Account,
    id: String,
    decision: Decision,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    ApprovalUseCase::new(state.repo.clone())
        .decide(&actor, &id, decision)
        .await?;

    Ok(Json(MessageResponse::ok(decision.success_message())))
}

/// POST /api/admin/bulk-approve
pub async fn bulk_approve<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(CurrentAccount(actor)): Extension<CurrentAccount>,
    ValidatedJson(req): ValidatedJson<BulkApproveRequest>,
) -> Json<BulkApproveResponse>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let output = ApprovalUseCase::new(state.repo.clone())
        .bulk_approve(&actor, &req.ids)
        .await;

    Json(BulkApproveResponse {
        success: true,
        requested: output.requested,
        modified_count: output.modified,
    })
}

/// GET /api/admin/pending-registrations
pub async fn pending_registrations<R, N>(
    State(state): State<AccountsState<R, N>>,
) -> AuthResult<Json<PendingRegistrationsResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let pending_users = ApprovalUseCase::new(state.repo.clone()).pending().await?;

    Ok(Json(PendingRegistrationsResponse {
        success: true,
        count: pending_users.len(),
        pending_users,
    }))
}
