//! Entity Module

pub mod account;
pub mod profile;

pub use account::{Account, AccountView};
pub use profile::{
    AcademicRecord, CompanyProfile, LegacyProfile, Profile, StudentProfile, SuperAdminProfile,
    TpoProfile,
};
