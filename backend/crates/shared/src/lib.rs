//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, business error codes and result aliases
//! - The success envelope every HTTP endpoint answers with
//! - Storage error classification shared by all repositories
//! - Typed snowflake IDs and their generator
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod code;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
pub mod store;
