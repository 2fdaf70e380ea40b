//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod admin;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod tpo;

pub use handlers::AccountsState;
pub use middleware::{CurrentAccount, InstituteScope, require_auth};
pub use router::{admin_router, api_router, auth_router, tpo_router};
