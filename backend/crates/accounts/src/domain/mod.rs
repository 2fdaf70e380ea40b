//! Domain Layer
//!
//! Contains entities, value objects, repository and notifier traits, and the
//! cross-store lookup rules.

pub mod directory;
pub mod entity;
pub mod notifier;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{Account, AccountView, Profile};
pub use notifier::EmailNotifier;
pub use repository::AccountRepository;
