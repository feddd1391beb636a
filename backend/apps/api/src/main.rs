//! API Server Entry Point
//!
//! Loads configuration, connects and migrates the database, then serves the
//! auth, release and media routers under `/v1`. Startup errors use `anyhow`;
//! request errors go through each crate's error enum.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{PgAuthRepository, SessionGuard, SessionTokenIssuer, WechatClient, auth_router};
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
    middleware,
    routing::get,
};
use kernel::id::SnowflakeGenerator;
use kernel::response::ApiResponse;
use media::media_router;
use release::{PgReleaseRepository, release_router};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Headroom above the upload limit for multipart framing and JSON bodies
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,release=info,media=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Shared services
    let ids = Arc::new(SnowflakeGenerator::new(config.snowflake_node_id)?);
    let issuer = Arc::new(SessionTokenIssuer::new(
        &config.auth.token_secret,
        config.auth.token_ttl,
    ));
    let wechat = WechatClient::new(config.wechat.clone())?;

    tracing::info!(
        app_id = %config.wechat.app_id,
        token_ttl_secs = config.auth.token_ttl_secs(),
        node_id = config.snowflake_node_id,
        "Services initialized"
    );

    // Uploads require a session
    let upload = media_router(config.upload.clone()).route_layer(middleware::from_fn_with_state(
        SessionGuard::new(issuer.clone()),
        auth::require_session,
    ));

    let v1 = Router::new()
        .merge(auth_router(
            PgAuthRepository::new(pool.clone()),
            wechat,
            issuer,
            ids.clone(),
            config.auth.clone(),
        ))
        .merge(release_router(
            PgReleaseRepository::new(pool.clone()),
            ids,
            config.release.clone(),
        ))
        .merge(upload)
        .route("/health", get(health));

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-admin-token"),
        ]))
        .allow_credentials(true);

    let body_limit = usize::try_from(config.upload.max_size)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_LIMIT_OVERHEAD);

    // Build router
    let app = Router::new()
        .nest("/v1", v1)
        .nest_service("/uploads", ServeDir::new(&config.upload.storage_path))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// GET /v1/health
async fn health() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "status": "ok" }))
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
