//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, random tokens, numeric codes)
//! - Password hashing (bcrypt)
//! - Session tokens (JWT)
//! - Cookie and bearer-token handling

pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod password;
