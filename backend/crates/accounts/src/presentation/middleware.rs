//! Request Gate and Role Guards
//!
//! [`require_auth`] resolves the session and stores the account in the
//! request extensions. The guards below it only read that extension, so they
//! must be layered inside `require_auth`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use platform::cookie::{extract_bearer_token, extract_cookie};

use crate::application::AuthenticateUseCase;
use crate::domain::entity::Account;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::role::Role;
use crate::error::AuthError;
use crate::presentation::handlers::AccountsState;

/// The authenticated account, available to handlers behind [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

/// Normalized institute name of the calling TPO
#[derive(Debug, Clone)]
pub struct InstituteScope(pub String);

/// Gate for protected routes: cookie first, then `Authorization: Bearer`
pub async fn require_auth<R, N>(
    State(state): State<AccountsState<R, N>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let headers = req.headers();
    let token = extract_cookie(headers, &state.config.cookie_name)
        .or_else(|| extract_bearer_token(headers));

    let account = AuthenticateUseCase::new(state.repo.clone(), state.config.clone())
        .execute(token.as_deref())
        .await?;

    req.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(req).await)
}

fn current_account(req: &Request) -> Result<&Account, AuthError> {
    req.extensions()
        .get::<CurrentAccount>()
        .map(|current| &current.0)
        .ok_or(AuthError::MissingToken)
}

/// admin or superadmin
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    if !current_account(&req)?.role().is_admin() {
        return Err(AuthError::Forbidden("Access denied. Admin privileges required"));
    }
    Ok(next.run(req).await)
}

pub async fn require_super_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    if !current_account(&req)?.role().is_super_admin() {
        return Err(AuthError::Forbidden(
            "Access denied. Superadmin privileges required",
        ));
    }
    Ok(next.run(req).await)
}

/// Verified email, external identity, or an operator role
pub async fn require_verified_email(req: Request, next: Next) -> Result<Response, AuthError> {
    let account = current_account(&req)?;
    if !account.has_confirmed_email() && !account.role().is_admin() {
        return Err(AuthError::EmailNotVerified {
            user_id: account.id.to_string(),
        });
    }
    Ok(next.run(req).await)
}

pub async fn require_tpo(req: Request, next: Next) -> Result<Response, AuthError> {
    if current_account(&req)?.role() != Role::Tpo {
        return Err(AuthError::Forbidden("Access denied. TPO privileges required"));
    }
    Ok(next.run(req).await)
}

/// Resolve the caller's institute into [`InstituteScope`]
pub async fn require_institute_scope(mut req: Request, next: Next) -> Result<Response, AuthError> {
    let institute = current_account(&req)?
        .profile
        .institute_name()
        .map(str::to_string)
        .ok_or(AuthError::NotFound("Institute not found"))?;

    req.extensions_mut().insert(InstituteScope(institute));

    Ok(next.run(req).await)
}
