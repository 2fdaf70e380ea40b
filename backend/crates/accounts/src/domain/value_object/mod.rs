//! Value Object Module

pub mod account_kind;
pub mod account_status;
pub mod contact_number;
pub mod email;
pub mod one_time_code;
pub mod password;
pub mod reset_token;
pub mod role;
