//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::store::StoreResult;

use crate::domain::entities::AppVersion;
use crate::domain::value_objects::VersionNumber;

/// AppVersion repository trait
#[trait_variant::make(AppVersionRepository: Send)]
pub trait LocalAppVersionRepository {
    /// Insert a new version; `Conflict` when the version string is taken
    async fn create(&self, version: &AppVersion) -> StoreResult<()>;

    /// The active version (newest `created_at` if more than one is flagged)
    async fn find_active(&self) -> StoreResult<Option<AppVersion>>;

    async fn find_by_version(&self, version: &VersionNumber) -> StoreResult<Option<AppVersion>>;

    /// Atomically make `version` the only active row
    ///
    /// Returns false, changing nothing, when the version does not exist.
    async fn set_active(&self, version: &VersionNumber) -> StoreResult<bool>;
}
