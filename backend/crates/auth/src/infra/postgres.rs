//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::store::{StoreError, StoreResult};
use sqlx::PgPool;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    open_id::OpenId,
    profile::{AvatarUrl, NickName},
    user_id::UserId,
};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                openid,
                nick_name,
                avatar_url,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.user_id.value())
        .bind(user.open_id.as_str())
        .bind(user.nick_name.as_str())
        .bind(user.avatar_url.as_str())
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_open_id(&self, open_id: &OpenId) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                openid,
                nick_name,
                avatar_url,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE openid = $1
            "#,
        )
        .bind(open_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update(&self, user: &User) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                nick_name = $2,
                avatar_url = $3,
                last_login_at = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.user_id.value())
        .bind(user.nick_name.as_str())
        .bind(user.avatar_url.as_str())
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    openid: String,
    nick_name: String,
    avatar_url: String,
    last_login_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> StoreResult<User> {
        let open_id = OpenId::new(self.openid)
            .map_err(|e| StoreError::backend(format!("Invalid openid: {}", e)))?;
        let nick_name = NickName::new(self.nick_name)
            .map_err(|e| StoreError::backend(format!("Invalid nick_name: {}", e)))?;
        let avatar_url = AvatarUrl::new(self.avatar_url)
            .map_err(|e| StoreError::backend(format!("Invalid avatar_url: {}", e)))?;

        Ok(User {
            user_id: UserId::from_i64(self.id),
            open_id,
            nick_name,
            avatar_url,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
