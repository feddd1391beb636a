//! Set Active Version Use Case
//!
//! The target must exist before anything is touched, so an unknown version
//! leaves the current active version in place.

use std::sync::Arc;

use platform::deadline::within;

use crate::application::config::ReleaseConfig;
use crate::domain::entities::AppVersion;
use crate::domain::repository::AppVersionRepository;
use crate::domain::value_objects::VersionNumber;
use crate::error::{ReleaseError, ReleaseResult};

/// Set active version use case
pub struct SetActiveVersionUseCase<R>
where
    R: AppVersionRepository,
{
    repo: Arc<R>,
    config: Arc<ReleaseConfig>,
}

impl<R> SetActiveVersionUseCase<R>
where
    R: AppVersionRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<ReleaseConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, version: &str) -> ReleaseResult<AppVersion> {
        let Ok(number) = VersionNumber::new(version) else {
            return Err(ReleaseError::VersionNotFound(version.to_string()));
        };
        let timeout = self.config.call_timeout;

        let target = within("version lookup", timeout, self.repo.find_by_version(&number))
            .await??
            .ok_or_else(|| ReleaseError::VersionNotFound(number.to_string()))?;

        let activated = within("version activate", timeout, self.repo.set_active(&number)).await??;
        if !activated {
            return Err(ReleaseError::VersionNotFound(number.to_string()));
        }

        tracing::info!(
            version = %number,
            was_active = target.is_active,
            "Active app version switched"
        );

        Ok(AppVersion {
            is_active: true,
            ..target
        })
    }
}
