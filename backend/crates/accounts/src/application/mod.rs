pub mod account_settings;
pub mod approval;
pub mod authenticate;
pub mod bootstrap;
pub mod config;
pub mod password_reset;
pub mod register;
pub mod sign_in;
pub mod student_directory;
pub mod verify_email;

pub use account_settings::{AccountSettingsUseCase, ChangePasswordInput};
pub use approval::{ApprovalUseCase, BulkApproveOutput, Decision, PendingRegistration};
pub use authenticate::AuthenticateUseCase;
pub use bootstrap::{BootstrapInput, BootstrapSuperAdminUseCase};
pub use config::{AuthConfig, EmailDeliveryPolicy};
pub use password_reset::{PasswordResetUseCase, ResetPasswordInput};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use student_directory::StudentDirectoryUseCase;
pub use verify_email::VerifyEmailUseCase;
