//! Contact Number Value Object
//!
//! Optional leading `+`, then 10 to 15 digits. Spaces and hyphens are
//! allowed as separators and kept as typed.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub struct ContactNumber(String);

impl ContactNumber {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Contact number is required"));
        }

        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let separators_only = body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
        let digits = body.chars().filter(char::is_ascii_digit).count();

        if !separators_only || !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(AppError::validation("Please enter a valid contact number"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_numbers() {
        assert!(ContactNumber::new("9876543210").is_ok());
        assert!(ContactNumber::new("+91 98765 43210").is_ok());
        assert!(ContactNumber::new("+1-555-123-4567").is_ok());
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(ContactNumber::new("").is_err());
        assert!(ContactNumber::new("12345").is_err());
        assert!(ContactNumber::new("98765abc10").is_err());
        assert!(ContactNumber::new("1234567890123456").is_err());
        assert!(ContactNumber::new("++919876543210").is_err());
    }
}
