//! Release (App Version) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - AppVersion entity, value objects, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL / in-memory implementations
//! - `presentation/` - HTTP handlers, admin guard
//!
//! ## Invariants
//! - At most one version is active; activation swaps in a single statement
//! - Activating an unknown version changes nothing
//! - Versions are never deleted

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ReleaseConfig;
pub use error::{ReleaseError, ReleaseResult};
pub use infra::postgres::PgReleaseRepository;
pub use presentation::router::release_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}
