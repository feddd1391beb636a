//! In-memory Repository
//!
//! Process-local user store with the same uniqueness guarantees as the
//! PostgreSQL schema. Used by tests and local runs without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use kernel::store::{StoreError, StoreResult};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::open_id::OpenId;

/// In-memory auth repository, keyed by open id
#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    users: Arc<Mutex<HashMap<OpenId, User>>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<OpenId, User>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> StoreResult<()> {
        let mut users = self.lock();
        if users.contains_key(&user.open_id) {
            return Err(StoreError::Conflict);
        }
        users.insert(user.open_id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_open_id(&self, open_id: &OpenId) -> StoreResult<Option<User>> {
        Ok(self.lock().get(open_id).cloned())
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        let mut users = self.lock();
        match users.get_mut(&user.open_id) {
            Some(stored) if stored.user_id == user.user_id => {
                *stored = user.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
