//! Account Status Value Object
//!
//! Approval state of an account, independent of email verification.
//! Only `Pending` ever transitions; `Active` and `Rejected` are terminal.

use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("active")]
    Active,
    #[display("rejected")]
    Rejected,
}

impl AccountStatus {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(AccountStatus::from_code("pending"), Some(AccountStatus::Pending));
        assert_eq!(AccountStatus::from_code("active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::from_code("rejected"), Some(AccountStatus::Rejected));
        assert_eq!(AccountStatus::from_code("disabled"), None);
        assert_eq!(AccountStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_only_pending_can_move() {
        assert!(!AccountStatus::Pending.is_terminal());
        assert!(AccountStatus::Active.is_terminal());
        assert!(AccountStatus::Rejected.is_terminal());
    }
}
