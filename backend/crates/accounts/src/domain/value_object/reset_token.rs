//! Password Reset Token
//!
//! The plain token (32 random bytes, hex) only ever leaves the server inside
//! the reset link. Storage keeps its SHA-256 digest and the expiry.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{random_hex, sha256_hex};

const TOKEN_BYTES: usize = 32;

/// Token as handed to the user
pub struct ResetToken(String);

impl ResetToken {
    /// Issue a new token and the digest to persist
    pub fn issue(ttl: Duration) -> (Self, ResetTokenDigest) {
        let token = Self(random_hex(TOKEN_BYTES));
        let digest = ResetTokenDigest {
            token_hash: token.hash(),
            expires_at: Utc::now() + ttl,
        };
        (token, digest)
    }

    /// Wrap a token submitted by the user
    pub fn from_submitted(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn hash(&self) -> String {
        sha256_hex(self.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResetToken([REDACTED])")
    }
}

/// Stored form of a reset token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTokenDigest {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetTokenDigest {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
