//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (AppVersion)
//! - Domain value objects (VersionNumber, ReleaseName)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
