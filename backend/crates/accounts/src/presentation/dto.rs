//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::PendingRegistration;
use crate::domain::entity::AccountView;
use crate::domain::value_object::{account_status::AccountStatus, role::Role};
use kernel::id::AccountId;

// ============================================================================
// Registration and verification
// ============================================================================

/// Register request. Missing fields reach the validator as empty values so
/// every problem is reported at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub role: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub college_name: Option<String>,
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub industry: Option<String>,
    pub institute_name: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: AccountId,
    pub role: Role,
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub user_id: String,
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

// ============================================================================
// Session
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Same value as the `token` cookie, for bearer clients
    pub token: String,
    pub user: AccountView,
}

/// `{success, message?, user}`
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub user: AccountView,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Password and account management
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BulkApproveRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkApproveResponse {
    pub success: bool,
    pub requested: usize,
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRegistrationsResponse {
    pub success: bool,
    pub count: usize,
    pub pending_users: Vec<PendingRegistration>,
}

// ============================================================================
// TPO
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StudentListResponse {
    pub success: bool,
    pub count: usize,
    pub students: Vec<AccountView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentResponse {
    pub success: bool,
    pub student: AccountView,
}
