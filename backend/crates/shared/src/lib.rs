//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every backend crate agrees on:
//! - The unified error type and its classification
//! - Typed ID wrappers
//!
//! Only things with one consistent meaning across the whole placement
//! backend belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
