//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use kernel::id::SnowflakeGenerator;

use crate::application::config::AuthConfig;
use crate::application::token::SessionTokenIssuer;
use crate::domain::identity::IdentityProvider;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgAuthRepository;
use crate::infra::wechat::WechatClient;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{SessionGuard, require_session};

/// Create the Auth router with PostgreSQL repository and the WeChat client
pub fn auth_router(
    repo: PgAuthRepository,
    identity: WechatClient,
    issuer: Arc<SessionTokenIssuer>,
    ids: Arc<SnowflakeGenerator>,
    config: AuthConfig,
) -> Router {
    auth_router_generic(repo, identity, issuer, ids, config)
}

/// Create a generic Auth router for any repository and identity provider
pub fn auth_router_generic<R, P>(
    repo: R,
    identity: P,
    issuer: Arc<SessionTokenIssuer>,
    ids: Arc<SnowflakeGenerator>,
    config: AuthConfig,
) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let guard = SessionGuard::new(issuer.clone());
    let state = AuthAppState {
        repo: Arc::new(repo),
        identity: Arc::new(identity),
        issuer,
        ids,
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/auth/refresh-token", post(handlers::refresh_token::<R, P>))
        .route(
            "/auth/user-info",
            get(handlers::get_user_info::<R, P>).put(handlers::update_user_info::<R, P>),
        )
        .route_layer(middleware::from_fn_with_state(guard, require_session));

    Router::new()
        .route("/auth/wechat-login", post(handlers::wechat_login::<R, P>))
        .merge(protected)
        .with_state(state)
}
