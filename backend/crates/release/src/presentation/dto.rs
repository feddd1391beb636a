//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::entities::AppVersion;

// ============================================================================
// Public
// ============================================================================

/// Version information shown to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersionResponse {
    pub version: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    pub force_update: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub release_notes: String,
    /// Milliseconds since the Unix epoch
    pub build_time: i64,
}

impl From<&AppVersion> for AppVersionResponse {
    fn from(v: &AppVersion) -> Self {
        Self {
            version: v.version.to_string(),
            name: v.name.as_str().to_string(),
            description: v.details.description.clone(),
            min_version: v.details.min_version.as_ref().map(|m| m.to_string()),
            force_update: v.details.force_update,
            release_notes: v.details.release_notes.clone(),
            build_time: v.build_time.timestamp_millis(),
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppVersionRequest {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub min_version: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub force_update: bool,
    #[serde(default)]
    pub release_notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveVersionRequest {
    #[serde(default)]
    pub version: String,
}

/// Version as seen by operators, with its activation state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAppVersionResponse {
    #[serde(flatten)]
    pub version: AppVersionResponse,
    pub is_active: bool,
    pub created_at: i64,
}

impl From<&AppVersion> for AdminAppVersionResponse {
    fn from(v: &AppVersion) -> Self {
        Self {
            version: AppVersionResponse::from(v),
            is_active: v.is_active,
            created_at: v.created_at.timestamp_millis(),
        }
    }
}
