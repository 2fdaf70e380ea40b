//! HTTP Handlers for `/api/auth`

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::{delete_cookie_header, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::{
    AccountSettingsUseCase, ChangePasswordInput, PasswordResetUseCase, RegisterInput,
    RegisterUseCase, ResetPasswordInput, SignInInput, SignInUseCase, VerifyEmailUseCase,
};
use crate::domain::entity::AccountView;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, DeleteAccountRequest, EmailRequest, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, RegisterResponse, ResetPasswordRequest, UserResponse,
    VerifyOtpRequest,
};
use crate::presentation::extract::ValidatedJson;
use crate::presentation::middleware::CurrentAccount;

/// Shared state for account handlers
pub struct AccountsState<R, N>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
}

impl<R, N> AccountsState<R, N>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    pub fn new(repo: R, notifier: N, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            notifier: Arc::new(notifier),
            config: Arc::new(config),
        }
    }
}

// R and N themselves need not be Clone
impl<R, N> Clone for AccountsState<R, N>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Registration and verification
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        role: req.role,
        email: req.email,
        password: req.password,
        confirm_password: req.confirm_password,
        name: req.name,
        roll_number: req.roll_number,
        branch: req.branch,
        graduation_year: req.graduation_year,
        college_name: req.college_name,
        company_name: req.company_name,
        contact_number: req.contact_number,
        industry: req.industry,
        institute_name: req.institute_name,
        designation: req.designation,
    };

    let output = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration successful. Please verify your email with the code we sent"
                .to_string(),
            user_id: output.user_id,
            role: output.role,
            status: output.status,
        }),
    ))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<VerifyOtpRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let account = use_case.verify(&req.user_id, &req.otp).await?;

    Ok(Json(UserResponse {
        success: true,
        message: Some("Email verified successfully".to_string()),
        user: AccountView::from(&account),
    }))
}

/// POST /api/auth/resend-verification
pub async fn resend_verification<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    use_case.resend(&req.email).await?;

    Ok(Json(MessageResponse::ok("Verification code sent")))
}

// ============================================================================
// Session
// ============================================================================

/// POST /api/auth/login
pub async fn login<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = set_cookie_header(&state.config.session_cookie(), &output.token)
        .ok_or_else(|| AuthError::Internal("Session token is not a valid header value".into()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            success: true,
            message: "Login successful".to_string(),
            token: output.token,
            user: AccountView::from(&output.account),
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout<R, N>(
    State(state): State<AccountsState<R, N>>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config)?)],
        Json(MessageResponse::ok("Logged out successfully")),
    ))
}

/// GET /api/auth/me
pub async fn me(Extension(CurrentAccount(account)): Extension<CurrentAccount>) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        message: None,
        user: AccountView::from(&account),
    })
}

// ============================================================================
// Password reset
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = PasswordResetUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    use_case.forgot(&req.email).await?;

    Ok(Json(MessageResponse::ok(
        "If an account exists with this email, a password reset link has been sent",
    )))
}

/// POST /api/auth/reset-password
pub async fn reset_password<R, N>(
    State(state): State<AccountsState<R, N>>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = PasswordResetUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    use_case
        .reset(ResetPasswordInput {
            token: req.token,
            password: req.password,
            confirm_password: req.confirm_password,
        })
        .await?;

    Ok(Json(MessageResponse::ok("Password reset successful")))
}

// ============================================================================
// Account settings (requires authentication)
// ============================================================================

/// POST /api/auth/change-password
pub async fn change_password<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = AccountSettingsUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .change_password(
            &account,
            ChangePasswordInput {
                current_password: req.current_password,
                new_password: req.new_password,
            },
        )
        .await?;

    Ok(Json(MessageResponse::ok("Password changed successfully")))
}

/// DELETE /api/auth/account
pub async fn delete_account<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
    ValidatedJson(req): ValidatedJson<DeleteAccountRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let use_case = AccountSettingsUseCase::new(state.repo.clone(), state.config.clone());

    use_case.delete_account(&account, req.password).await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie(&state.config)?)],
        Json(MessageResponse::ok("Account deleted successfully")),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn clear_session_cookie(config: &AuthConfig) -> AuthResult<axum::http::HeaderValue> {
    delete_cookie_header(&config.session_cookie())
        .ok_or_else(|| AuthError::Internal("Cookie name is not a valid header value".into()))
}
