use derive_more::Display;
use serde::Serialize;

use super::role::Role;

/// Which store an account lives in
///
/// Each kind maps to its own table. `Legacy` is the older unified table that
/// carries a role column and nested role profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    #[display("student")]
    Student,
    #[display("company")]
    Company,
    #[display("tpo")]
    Tpo,
    #[display("superAdmin")]
    SuperAdmin,
    #[display("legacy")]
    Legacy,
}

impl AccountKind {
    pub const ALL: [AccountKind; 5] = [
        AccountKind::Student,
        AccountKind::Company,
        AccountKind::Tpo,
        AccountKind::SuperAdmin,
        AccountKind::Legacy,
    ];

    #[inline]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Company => "companies",
            Self::Tpo => "tpos",
            Self::SuperAdmin => "super_admins",
            Self::Legacy => "users",
        }
    }

    /// Role implied by the store; legacy records carry their own
    #[inline]
    pub const fn fixed_role(&self) -> Option<Role> {
        match self {
            Self::Student => Some(Role::Student),
            Self::Company => Some(Role::Company),
            Self::Tpo => Some(Role::Tpo),
            Self::SuperAdmin => Some(Role::SuperAdmin),
            Self::Legacy => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_distinct_table() {
        let mut tables: Vec<_> = AccountKind::ALL.iter().map(|k| k.table()).collect();
        tables.sort_unstable();
        tables.dedup();
        assert_eq!(tables.len(), AccountKind::ALL.len());
    }

    #[test]
    fn test_fixed_roles() {
        assert_eq!(AccountKind::Tpo.fixed_role(), Some(Role::Tpo));
        assert_eq!(AccountKind::Legacy.fixed_role(), None);
    }
}
