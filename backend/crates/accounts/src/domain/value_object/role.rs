use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Role carried by an account
///
/// `Admin` only exists on legacy unified records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("student")]
    Student,
    #[display("company")]
    Company,
    #[display("tpo")]
    Tpo,
    #[display("admin")]
    Admin,
    #[display("superadmin")]
    SuperAdmin,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Student => "student",
            Company => "company",
            Tpo => "tpo",
            Admin => "admin",
            SuperAdmin => "superadmin",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "student" => Some(Student),
            "company" => Some(Company),
            "tpo" => Some(Tpo),
            "admin" => Some(Admin),
            "superadmin" => Some(SuperAdmin),
            _ => None,
        }
    }

    /// Roles a visitor may pick at registration
    #[inline]
    pub fn from_registration_code(code: &str) -> Option<Self> {
        match Self::from_code(code.trim())? {
            role @ (Role::Student | Role::Company | Role::Tpo) => Some(role),
            _ => None,
        }
    }

    /// admin or superadmin
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    #[inline]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}
