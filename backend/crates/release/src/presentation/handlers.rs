//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use kernel::id::SnowflakeGenerator;
use kernel::response::ApiResponse;

use crate::application::{
    CreateVersionInput, CreateVersionUseCase, GetCurrentVersionUseCase, GetVersionUseCase,
    ReleaseConfig, SetActiveVersionUseCase,
};
use crate::domain::repository::AppVersionRepository;
use crate::error::{ReleaseError, ReleaseResult};
use crate::presentation::dto::{
    AdminAppVersionResponse, AppVersionResponse, CreateAppVersionRequest, SetActiveVersionRequest,
};

/// Application state for release handlers
pub struct ReleaseAppState<R>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub ids: Arc<SnowflakeGenerator>,
    pub config: Arc<ReleaseConfig>,
}

impl<R> Clone for ReleaseAppState<R>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            ids: self.ids.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Public
// ============================================================================

/// GET /auth/app-version
pub async fn current_version<R>(
    State(state): State<ReleaseAppState<R>>,
) -> ReleaseResult<ApiResponse<AppVersionResponse>>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    let use_case = GetCurrentVersionUseCase::new(state.repo.clone(), state.config.clone());
    let version = use_case.execute().await?;

    Ok(ApiResponse::success(AppVersionResponse::from(&version)))
}

/// GET /auth/app-version/{version}
pub async fn version_by_number<R>(
    State(state): State<ReleaseAppState<R>>,
    Path(version): Path<String>,
) -> ReleaseResult<ApiResponse<AppVersionResponse>>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    let use_case = GetVersionUseCase::new(state.repo.clone(), state.config.clone());
    let version = use_case.execute(&version).await?;

    Ok(ApiResponse::success(AppVersionResponse::from(&version)))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /admin/app-versions
pub async fn create_version<R>(
    State(state): State<ReleaseAppState<R>>,
    payload: Result<Json<CreateAppVersionRequest>, JsonRejection>,
) -> ReleaseResult<ApiResponse<AdminAppVersionResponse>>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| ReleaseError::Validation(e.body_text()))?;

    let use_case =
        CreateVersionUseCase::new(state.repo.clone(), state.ids.clone(), state.config.clone());

    let version = use_case
        .execute(CreateVersionInput {
            version: req.version,
            name: req.name,
            description: req.description,
            min_version: req.min_version,
            is_active: req.is_active,
            force_update: req.force_update,
            release_notes: req.release_notes,
        })
        .await?;

    Ok(ApiResponse::success(AdminAppVersionResponse::from(&version)))
}

/// PUT /admin/app-versions/active
pub async fn set_active_version<R>(
    State(state): State<ReleaseAppState<R>>,
    payload: Result<Json<SetActiveVersionRequest>, JsonRejection>,
) -> ReleaseResult<ApiResponse<AdminAppVersionResponse>>
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| ReleaseError::Validation(e.body_text()))?;

    let use_case = SetActiveVersionUseCase::new(state.repo.clone(), state.config.clone());
    let version = use_case.execute(&req.version).await?;

    Ok(ApiResponse::success(AdminAppVersionResponse::from(&version)))
}
