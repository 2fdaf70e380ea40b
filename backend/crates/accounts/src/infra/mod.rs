//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod mail;
pub mod memory;
pub mod postgres;

pub use mail::{LogNotifier, SmtpNotifier, SmtpSettings};
pub use memory::InMemoryAccountRepository;
pub use postgres::PgAccountRepository;
