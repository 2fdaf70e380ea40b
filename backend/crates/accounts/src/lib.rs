//! Accounts Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and notifier traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL and in-memory repositories, SMTP notifier
//! - `presentation/` - HTTP handlers, DTOs, middleware, routers
//!
//! ## Account lifecycle
//! - Registration creates a pending, unverified account and emails a code
//! - The code verifies the email; approval stays a separate operator step
//! - Sign-in requires approval and a confirmed email (superadmin exempt)
//! - Sessions are JWTs delivered as an HttpOnly cookie and in the body
//!
//! ## Storage model
//! One table per account kind plus the older unified `users` table.
//! Lookups search the tables in a fixed order (see `domain::directory`).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, EmailDeliveryPolicy};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAccountRepository, LogNotifier, PgAccountRepository, SmtpNotifier};
pub use presentation::{AccountsState, api_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
