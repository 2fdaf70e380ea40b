//! Account Routers

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};

use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AccountsState};
use crate::presentation::middleware::{
    require_admin, require_auth, require_institute_scope, require_tpo, require_verified_email,
};
use crate::presentation::{admin, tpo};

/// `/api/auth`
pub fn auth_router<R, N>(state: AccountsState<R, N>) -> Router
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/change-password", post(handlers::change_password::<R, N>))
        .route("/account", delete(handlers::delete_account::<R, N>))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<R, N>));

    Router::new()
        .route("/register", post(handlers::register::<R, N>))
        .route("/verify-otp", post(handlers::verify_otp::<R, N>))
        .route(
            "/resend-verification",
            post(handlers::resend_verification::<R, N>),
        )
        .route("/login", post(handlers::login::<R, N>))
        .route("/logout", post(handlers::logout::<R, N>))
        .route("/forgot-password", post(handlers::forgot_password::<R, N>))
        .route("/reset-password", post(handlers::reset_password::<R, N>))
        .merge(protected)
        .with_state(state)
}

/// `/api/admin`: gate, then admin guard
pub fn admin_router<R, N>(state: AccountsState<R, N>) -> Router
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    Router::new()
        .route("/approve-user/{id}", post(admin::approve_user::<R, N>))
        .route("/reject-user/{id}", post(admin::reject_user::<R, N>))
        .route("/bulk-approve", post(admin::bulk_approve::<R, N>))
        .route(
            "/pending-registrations",
            get(admin::pending_registrations::<R, N>),
        )
        // Last route_layer runs first
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<R, N>))
        .with_state(state)
}

/// `/api/tpo`: gate, verified email, TPO role, institute scope
pub fn tpo_router<R, N>(state: AccountsState<R, N>) -> Router
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    Router::new()
        .route("/students", get(tpo::list_students::<R, N>))
        .route("/students/{student_id}", get(tpo::get_student::<R, N>))
        .route_layer(from_fn(require_institute_scope))
        .route_layer(from_fn(require_tpo))
        .route_layer(from_fn(require_verified_email))
        .route_layer(from_fn_with_state(state.clone(), require_auth::<R, N>))
        .with_state(state)
}

/// Every account route under `/api`
pub fn api_router<R, N>(state: AccountsState<R, N>) -> Router
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .nest("/api/admin", admin_router(state.clone()))
        .nest("/api/tpo", tpo_router(state))
}
