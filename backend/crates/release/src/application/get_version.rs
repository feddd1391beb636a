//! Version Lookup Use Cases
//!
//! Public reads: the version clients should run, and any published version.

use std::sync::Arc;

use platform::deadline::within;

use crate::application::config::ReleaseConfig;
use crate::domain::entities::AppVersion;
use crate::domain::repository::AppVersionRepository;
use crate::domain::value_objects::VersionNumber;
use crate::error::{ReleaseError, ReleaseResult};

/// Get the currently active version
pub struct GetCurrentVersionUseCase<R>
where
    R: AppVersionRepository,
{
    repo: Arc<R>,
    config: Arc<ReleaseConfig>,
}

impl<R> GetCurrentVersionUseCase<R>
where
    R: AppVersionRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<ReleaseConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self) -> ReleaseResult<AppVersion> {
        within("version lookup", self.config.call_timeout, self.repo.find_active())
            .await??
            .ok_or(ReleaseError::NoActiveVersion)
    }
}

/// Get a version by its version string
pub struct GetVersionUseCase<R>
where
    R: AppVersionRepository,
{
    repo: Arc<R>,
    config: Arc<ReleaseConfig>,
}

impl<R> GetVersionUseCase<R>
where
    R: AppVersionRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<ReleaseConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, version: &str) -> ReleaseResult<AppVersion> {
        // A malformed version can never have been stored
        let Ok(number) = VersionNumber::new(version) else {
            return Err(ReleaseError::VersionNotFound(version.to_string()));
        };

        within(
            "version lookup",
            self.config.call_timeout,
            self.repo.find_by_version(&number),
        )
        .await??
        .ok_or_else(|| ReleaseError::VersionNotFound(number.to_string()))
    }
}
