//! Password Hashing and Verification
//!
//! - bcrypt hashing with a configurable cost (12 in production)
//! - Zeroization of clear text on drop
//! - NFKC normalization before length checks and hashing
//!
//! Clear text never appears in `Debug` output, and hashes print as `[HASH]`.

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// bcrypt work factor used for stored passwords
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest cost bcrypt accepts; only meant for tests
pub const MIN_BCRYPT_COST: u32 = 4;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(#[from] bcrypt::BcryptError),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; Debug output is redacted.
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("abcdef".to_string()).unwrap();
/// let hashed = password.hash(4).unwrap();
/// assert!(hashed.verify(&password));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Validate and wrap a password
    ///
    /// - NFKC normalized first
    /// - 6..=128 Unicode code points
    /// - not whitespace only, no control characters other than tab/newline
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        let candidate = Self(normalized);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = candidate.0.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Wrap without the policy checks.
    ///
    /// Used for login and password re-entry, where the stored hash decides
    /// and a policy error would leak information.
    pub fn unchecked(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash with bcrypt at the given cost
    pub fn hash(&self, cost: u32) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::hash(self.as_bytes(), cost)?;
        Ok(HashedPassword { hash })
    }

    /// Character-wise equality, used for the confirm-password check
    pub fn matches(&self, other: &ClearTextPassword) -> bool {
        crate::crypto::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$12$...`)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Restore from storage
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        // $2a$, $2b$, $2x$, $2y$ followed by a two digit cost
        let valid = hash.len() == 60
            && hash.starts_with("$2")
            && hash.as_bytes().get(3) == Some(&b'$')
            && hash.as_bytes().get(6) == Some(&b'$');
        if !valid {
            return Err(PasswordHashError::InvalidHashFormat);
        }
        Ok(Self { hash })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash. A malformed hash never verifies.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        bcrypt::verify(password.as_bytes(), &self.hash).unwrap_or(false)
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
