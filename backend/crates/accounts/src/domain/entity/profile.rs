//! Role Profiles
//!
//! The role-specific half of an account. Which variant an account carries
//! decides the table it lives in.

use serde::Serialize;

use crate::domain::value_object::{
    account_kind::AccountKind, contact_number::ContactNumber, role::Role,
};

/// Academic details shared by student accounts and legacy student records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    pub roll_number: String,
    pub branch: String,
    pub graduation_year: i32,
    pub college_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    #[serde(flatten)]
    pub academic: AcademicRecord,
    /// Mirrors `status == active`; kept in sync on every transition
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    pub contact_number: ContactNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TpoProfile {
    pub name: String,
    pub institute_name: String,
    pub contact_number: ContactNumber,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperAdminProfile {
    pub name: String,
}

/// Record from the older unified table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyProfile {
    #[serde(skip)]
    pub role: Role,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<AcademicRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tpo: Option<TpoProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Profile {
    Student(StudentProfile),
    Company(CompanyProfile),
    Tpo(TpoProfile),
    SuperAdmin(SuperAdminProfile),
    Legacy(LegacyProfile),
}

impl Profile {
    pub fn kind(&self) -> AccountKind {
        match self {
            Profile::Student(_) => AccountKind::Student,
            Profile::Company(_) => AccountKind::Company,
            Profile::Tpo(_) => AccountKind::Tpo,
            Profile::SuperAdmin(_) => AccountKind::SuperAdmin,
            Profile::Legacy(_) => AccountKind::Legacy,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Legacy(legacy) => legacy.role,
            other => other.kind().fixed_role().unwrap_or(Role::Student),
        }
    }

    /// Best-effort human name for listings
    pub fn display_name(&self) -> &str {
        match self {
            Profile::Student(p) => &p.name,
            Profile::Company(p) => &p.company_name,
            Profile::Tpo(p) => &p.name,
            Profile::SuperAdmin(p) => &p.name,
            Profile::Legacy(p) => {
                if !p.name.is_empty() {
                    &p.name
                } else if let Some(company) = &p.company {
                    &company.company_name
                } else if let Some(tpo) = &p.tpo {
                    &tpo.name
                } else {
                    ""
                }
            }
        }
    }

    /// Academic record when this profile describes a student
    pub fn academic(&self) -> Option<&AcademicRecord> {
        match self {
            Profile::Student(p) => Some(&p.academic),
            Profile::Legacy(p) if p.role == Role::Student => p.student.as_ref(),
            _ => None,
        }
    }

    /// Institute a TPO profile belongs to
    pub fn institute_name(&self) -> Option<&str> {
        let name = match self {
            Profile::Tpo(p) => Some(p.institute_name.as_str()),
            Profile::Legacy(p) if p.role == Role::Tpo => {
                p.tpo.as_ref().map(|t| t.institute_name.as_str())
            }
            _ => None,
        }?;
        let name = name.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// Institute names compare case-insensitively, ignoring surrounding space
pub fn same_institute(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
