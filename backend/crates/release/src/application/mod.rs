//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod config;
pub mod create_version;
pub mod get_version;
pub mod set_active_version;

pub use config::ReleaseConfig;
pub use create_version::{CreateVersionInput, CreateVersionUseCase};
pub use get_version::{GetCurrentVersionUseCase, GetVersionUseCase};
pub use set_active_version::SetActiveVersionUseCase;
