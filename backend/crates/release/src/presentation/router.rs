//! Release Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use kernel::id::SnowflakeGenerator;

use crate::application::config::ReleaseConfig;
use crate::domain::repository::AppVersionRepository;
use crate::infra::postgres::PgReleaseRepository;
use crate::presentation::handlers::{self, ReleaseAppState};
use crate::presentation::middleware::{AdminGuard, require_admin};

/// Create the release router with PostgreSQL repository
pub fn release_router(
    repo: PgReleaseRepository,
    ids: Arc<SnowflakeGenerator>,
    config: ReleaseConfig,
) -> Router {
    release_router_generic(repo, ids, config)
}

/// Create a generic release router for any repository implementation
///
/// Admin routes are mounted only when an admin token is configured.
pub fn release_router_generic<R>(
    repo: R,
    ids: Arc<SnowflakeGenerator>,
    config: ReleaseConfig,
) -> Router
where
    R: AppVersionRepository + Send + Sync + 'static,
{
    let admin_token = config.admin_token.clone().filter(|t| !t.is_empty());
    let state = ReleaseAppState {
        repo: Arc::new(repo),
        ids,
        config: Arc::new(config),
    };

    let mut router = Router::new()
        .route("/auth/app-version", get(handlers::current_version::<R>))
        .route(
            "/auth/app-version/{version}",
            get(handlers::version_by_number::<R>),
        );

    if let Some(token) = admin_token {
        let admin = Router::new()
            .route("/admin/app-versions", post(handlers::create_version::<R>))
            .route(
                "/admin/app-versions/active",
                put(handlers::set_active_version::<R>),
            )
            .route_layer(middleware::from_fn_with_state(
                AdminGuard::new(token),
                require_admin,
            ));
        router = router.merge(admin);
    } else {
        tracing::info!("ADMIN_TOKEN not set, admin version routes disabled");
    }

    router.with_state(state)
}
