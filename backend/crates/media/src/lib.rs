//! Media (Upload) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Upload types, related ids, the file store port
//! - `application/` - Upload policy and use case
//! - `infra/` - Local filesystem store
//! - `presentation/` - Multipart handler and router
//!
//! Every check runs before the store is called; an oversized body is cut off
//! while it is still being read.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::UploadConfig;
pub use error::{MediaError, MediaResult};
pub use infra::disk::DiskFileStore;
pub use presentation::router::media_router;

pub mod router {
    pub use crate::presentation::router::*;
}
