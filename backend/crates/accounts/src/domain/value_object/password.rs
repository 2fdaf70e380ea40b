//! Account Password Value Objects
//!
//! Domain wrappers over `platform::password`:
//! - [`RawPassword`] is user input, zeroized on drop
//! - [`PasswordHash`] is the bcrypt hash that gets stored
//!
//! ## Usage
//! ```rust
//! use accounts::domain::value_object::password::{PasswordHash, RawPassword};
//!
//! let raw = RawPassword::new("abcdef".to_string()).unwrap();
//! let hashed = PasswordHash::from_raw(&raw, 4).unwrap();
//! assert!(hashed.verify(&raw));
//! ```

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a new password (registration, reset, change)
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => AppError::validation(format!(
                "Password must be at least {} characters",
                min
            )),
            PasswordPolicyError::TooLong { max, .. } => AppError::validation(format!(
                "Password must be at most {} characters",
                max
            )),
            PasswordPolicyError::EmptyOrWhitespace => AppError::validation("Password is required"),
            PasswordPolicyError::InvalidCharacter => {
                AppError::validation("Password contains invalid characters")
                    .with_action("Please remove any special control characters")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Wrap a password that is only compared against a stored hash
    pub fn for_comparison(raw: String) -> Self {
        Self(ClearTextPassword::unchecked(raw))
    }

    pub fn matches(&self, other: &RawPassword) -> bool {
        self.0.matches(&other.0)
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Password Hash (for storage)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(HashedPassword);

impl PasswordHash {
    /// Hash a validated password with bcrypt at `cost`
    pub fn from_raw(raw: &RawPassword, cost: u32) -> AppResult<Self> {
        let hashed = raw
            .inner()
            .hash(cost)
            .map_err(|e| AppError::internal(e.to_string()).with_source(e))?;

        Ok(Self(hashed))
    }

    /// Restore from a stored bcrypt string
    pub fn from_db(stored: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_stored(stored)
            .map_err(|_| AppError::internal("Invalid password hash in database"))?;

        Ok(Self(hashed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.inner())
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
