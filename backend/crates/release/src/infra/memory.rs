//! In-memory Repository
//!
//! Process-local version store. A single mutex guards the map, so the
//! activation swap is atomic the same way the PostgreSQL transaction is.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use kernel::store::{StoreError, StoreResult};

use crate::domain::entities::AppVersion;
use crate::domain::repository::AppVersionRepository;
use crate::domain::value_objects::VersionNumber;

#[derive(Clone, Default)]
pub struct InMemoryReleaseRepository {
    versions: Arc<Mutex<BTreeMap<VersionNumber, AppVersion>>>,
}

impl InMemoryReleaseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Versions currently flagged active
    pub fn active_versions(&self) -> Vec<VersionNumber> {
        self.lock()
            .values()
            .filter(|v| v.is_active)
            .map(|v| v.version.clone())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<VersionNumber, AppVersion>> {
        self.versions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AppVersionRepository for InMemoryReleaseRepository {
    async fn create(&self, version: &AppVersion) -> StoreResult<()> {
        let mut versions = self.lock();
        if versions.contains_key(&version.version) {
            return Err(StoreError::Conflict);
        }
        versions.insert(
            version.version.clone(),
            AppVersion {
                is_active: false,
                ..version.clone()
            },
        );
        Ok(())
    }

    async fn find_active(&self) -> StoreResult<Option<AppVersion>> {
        Ok(self
            .lock()
            .values()
            .filter(|v| v.is_active)
            .max_by_key(|v| v.created_at)
            .cloned())
    }

    async fn find_by_version(&self, version: &VersionNumber) -> StoreResult<Option<AppVersion>> {
        Ok(self.lock().get(version).cloned())
    }

    async fn set_active(&self, version: &VersionNumber) -> StoreResult<bool> {
        let mut versions = self.lock();
        if !versions.contains_key(version) {
            return Ok(false);
        }

        let now = Utc::now();
        for (key, stored) in versions.iter_mut() {
            if stored.is_active || key == version {
                stored.is_active = key == version;
                stored.updated_at = now;
            }
        }
        Ok(true)
    }
}
