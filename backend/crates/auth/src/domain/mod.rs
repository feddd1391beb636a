//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the identity
//! provider port.

pub mod entity;
pub mod identity;
pub mod repository;
pub mod subscribe_message;
pub mod value_object;

// Re-exports
pub use entity::user::User;
pub use identity::{CodeExchange, ExternalIdentity, IdentityError, IdentityProvider};
pub use repository::UserRepository;
