//! One-Time Code Value Object
//!
//! Six-digit email verification code with an expiry. A new code always
//! replaces the previous one.

use chrono::{DateTime, Duration, Utc};
use kernel::error::app_error::{AppError, AppResult};
use platform::crypto::{constant_time_eq, numeric_code};

pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    code: String,
    expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Fresh random code valid for `ttl`
    pub fn generate(ttl: Duration) -> Self {
        Self {
            code: numeric_code().to_string(),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn from_db(code: String, expires_at: DateTime<Utc>) -> Self {
        Self { code, expires_at }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Valid up to and including `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn matches(&self, submitted: &SubmittedCode) -> bool {
        constant_time_eq(self.code.as_bytes(), submitted.0.as_bytes())
    }
}

/// A code typed by the user: exactly six ASCII digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCode(String);

impl SubmittedCode {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let raw = raw.trim();
        if raw.len() != CODE_LENGTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation("OTP must be a 6-digit number"));
        }
        Ok(Self(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let otp = OneTimeCode::generate(Duration::minutes(10));
        assert_eq!(otp.code().len(), CODE_LENGTH);
        assert!(otp.code().bytes().all(|b| b.is_ascii_digit()));
        assert!(!otp.code().starts_with('0'));
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expires_at = Utc::now();
        let otp = OneTimeCode::from_db("123456".into(), expires_at);
        assert!(!otp.is_expired_at(expires_at));
        assert!(otp.is_expired_at(expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_matches() {
        let otp = OneTimeCode::from_db("123456".into(), Utc::now());
        assert!(otp.matches(&SubmittedCode::parse("123456").unwrap()));
        assert!(!otp.matches(&SubmittedCode::parse("654321").unwrap()));
    }

    #[test]
    fn test_submitted_code_format() {
        assert!(SubmittedCode::parse(" 123456 ").is_ok());
        assert!(SubmittedCode::parse("12345").is_err());
        assert!(SubmittedCode::parse("1234567").is_err());
        assert!(SubmittedCode::parse("12a456").is_err());
        assert!(SubmittedCode::parse("１２３４５６").is_err());
    }
}
