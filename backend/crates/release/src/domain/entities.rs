//! Domain Entities
//!
//! Core business entities for the release domain.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{AppVersionId, ReleaseName, VersionNumber};

/// Free-form release metadata shown to clients
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseDetails {
    pub description: String,
    /// Oldest client version still allowed to run
    pub min_version: Option<VersionNumber>,
    pub force_update: bool,
    pub release_notes: String,
}

/// AppVersion entity - one published build of the mini-program
///
/// At most one version is active at a time. A version only becomes inactive
/// when another one is activated; versions are never deleted.
#[derive(Debug, Clone)]
pub struct AppVersion {
    pub id: AppVersionId,
    pub version: VersionNumber,
    pub name: ReleaseName,
    pub details: ReleaseDetails,
    pub is_active: bool,
    pub build_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppVersion {
    /// Create a new, inactive version
    pub fn draft(
        id: AppVersionId,
        version: VersionNumber,
        name: ReleaseName,
        details: ReleaseDetails,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            version,
            name,
            details,
            is_active: false,
            build_time: now,
            created_at: now,
            updated_at: now,
        }
    }
}
