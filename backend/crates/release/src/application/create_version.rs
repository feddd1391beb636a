//! Create Version Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::id::SnowflakeGenerator;
use kernel::store::StoreError;
use platform::deadline::within;

use crate::application::config::ReleaseConfig;
use crate::domain::entities::{AppVersion, ReleaseDetails};
use crate::domain::repository::AppVersionRepository;
use crate::domain::value_objects::{ReleaseName, VersionNumber};
use crate::error::{ReleaseError, ReleaseResult};

/// Create version input
#[derive(Debug, Clone, Default)]
pub struct CreateVersionInput {
    pub version: String,
    pub name: String,
    pub description: String,
    pub min_version: Option<String>,
    pub is_active: bool,
    pub force_update: bool,
    pub release_notes: String,
}

/// Create version use case
pub struct CreateVersionUseCase<R>
where
    R: AppVersionRepository,
{
    repo: Arc<R>,
    ids: Arc<SnowflakeGenerator>,
    config: Arc<ReleaseConfig>,
}

impl<R> CreateVersionUseCase<R>
where
    R: AppVersionRepository + Send + Sync,
{
    pub fn new(repo: Arc<R>, ids: Arc<SnowflakeGenerator>, config: Arc<ReleaseConfig>) -> Self {
        Self { repo, ids, config }
    }

    pub async fn execute(&self, input: CreateVersionInput) -> ReleaseResult<AppVersion> {
        let version = VersionNumber::new(input.version)?;
        let name = ReleaseName::new(input.name)?;
        let min_version = input
            .min_version
            .filter(|v| !v.trim().is_empty())
            .map(VersionNumber::new)
            .transpose()?;

        let mut app_version = AppVersion::draft(
            self.ids.next_id(),
            version,
            name,
            ReleaseDetails {
                description: input.description,
                min_version,
                force_update: input.force_update,
                release_notes: input.release_notes,
            },
            Utc::now(),
        );

        let timeout = self.config.call_timeout;

        // Inserted inactive; activation goes through the same swap as SetActive
        match within("version create", timeout, self.repo.create(&app_version)).await? {
            Ok(()) => {}
            Err(StoreError::Conflict) => {
                return Err(ReleaseError::DuplicateVersion(app_version.version.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        if input.is_active {
            let activated = within(
                "version activate",
                timeout,
                self.repo.set_active(&app_version.version),
            )
            .await??;
            if !activated {
                return Err(ReleaseError::VersionNotFound(app_version.version.to_string()));
            }
            app_version.is_active = true;
        }

        tracing::info!(
            version = %app_version.version,
            is_active = app_version.is_active,
            force_update = app_version.details.force_update,
            "App version created"
        );

        Ok(app_version)
    }
}
