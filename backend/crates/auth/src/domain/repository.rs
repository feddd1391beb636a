//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::store::StoreResult;

use crate::domain::entity::user::User;
use crate::domain::value_object::open_id::OpenId;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user
    ///
    /// Fails with `StoreError::Conflict` when a user with the same open id exists.
    async fn create(&self, user: &User) -> StoreResult<()>;

    /// Find user by external identity
    async fn find_by_open_id(&self, open_id: &OpenId) -> StoreResult<Option<User>>;

    /// Persist the mutable fields of an existing user
    ///
    /// Returns `false` when no such user exists.
    async fn update(&self, user: &User) -> StoreResult<bool>;
}
