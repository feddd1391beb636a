//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::store::{StoreError, StoreResult};
use sqlx::PgPool;

use crate::domain::entities::{AppVersion, ReleaseDetails};
use crate::domain::repository::AppVersionRepository;
use crate::domain::value_objects::{AppVersionId, ReleaseName, VersionNumber};

/// PostgreSQL-backed release repository
#[derive(Clone)]
pub struct PgReleaseRepository {
    pool: PgPool,
}

impl PgReleaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        version,
        name,
        description,
        min_version,
        is_active,
        force_update,
        release_notes,
        build_time,
        created_at,
        updated_at
    FROM app_versions
"#;

impl AppVersionRepository for PgReleaseRepository {
    async fn create(&self, version: &AppVersion) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO app_versions (
                id,
                version,
                name,
                description,
                min_version,
                is_active,
                force_update,
                release_notes,
                build_time,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(version.id.value())
        .bind(version.version.as_str())
        .bind(version.name.as_str())
        .bind(&version.details.description)
        .bind(version.details.min_version.as_ref().map(|v| v.as_str()))
        .bind(version.details.force_update)
        .bind(&version.details.release_notes)
        .bind(version.build_time)
        .bind(version.created_at)
        .bind(version.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(&self) -> StoreResult<Option<AppVersion>> {
        let query = format!(
            "{} WHERE is_active ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, AppVersionRow>(&query)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_app_version()).transpose()
    }

    async fn find_by_version(&self, version: &VersionNumber) -> StoreResult<Option<AppVersion>> {
        let query = format!("{} WHERE version = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, AppVersionRow>(&query)
            .bind(version.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_app_version()).transpose()
    }

    async fn set_active(&self, version: &VersionNumber) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Serializes activations against each other; plain reads are not blocked
        sqlx::query("LOCK TABLE app_versions IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let target: Option<i64> =
            sqlx::query_scalar("SELECT id FROM app_versions WHERE version = $1")
                .bind(version.as_str())
                .fetch_optional(&mut *tx)
                .await?;

        if target.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        // Single statement: no reader sees zero or two active rows
        sqlx::query(
            r#"
            UPDATE app_versions SET
                is_active = (version = $1),
                updated_at = NOW()
            WHERE is_active OR version = $1
            "#,
        )
        .bind(version.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AppVersionRow {
    id: i64,
    version: String,
    name: String,
    description: String,
    min_version: Option<String>,
    is_active: bool,
    force_update: bool,
    release_notes: String,
    build_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AppVersionRow {
    fn into_app_version(self) -> StoreResult<AppVersion> {
        let version = VersionNumber::new(self.version)
            .map_err(|e| StoreError::backend(format!("Invalid version: {}", e)))?;
        let name = ReleaseName::new(self.name)
            .map_err(|e| StoreError::backend(format!("Invalid name: {}", e)))?;
        let min_version = self
            .min_version
            .filter(|v| !v.is_empty())
            .map(VersionNumber::new)
            .transpose()
            .map_err(|e| StoreError::backend(format!("Invalid min_version: {}", e)))?;

        Ok(AppVersion {
            id: AppVersionId::from_i64(self.id),
            version,
            name,
            details: ReleaseDetails {
                description: self.description,
                min_version,
                force_update: self.force_update,
                release_notes: self.release_notes,
            },
            is_active: self.is_active,
            build_time: self.build_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
