//! Media Router

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::post};

use crate::application::{UploadConfig, UploadPolicy};
use crate::domain::storage::FileStore;
use crate::infra::disk::DiskFileStore;
use crate::presentation::handlers::{self, MediaAppState};

/// Room for multipart boundaries and the text fields around the file
const FORM_OVERHEAD: usize = 64 * 1024;

/// Create the media router storing files on local disk
pub fn media_router(config: UploadConfig) -> Router {
    let store = DiskFileStore::new(config.storage_path.clone());
    media_router_generic(store, config)
}

/// Create a generic media router for any file store
///
/// Routes are unauthenticated here; the caller layers the session guard on.
pub fn media_router_generic<S>(store: S, config: UploadConfig) -> Router
where
    S: FileStore + Send + Sync + 'static,
{
    let body_limit = usize::try_from(config.max_size)
        .unwrap_or(usize::MAX)
        .saturating_add(FORM_OVERHEAD);

    let state = MediaAppState {
        store: Arc::new(store),
        policy: Arc::new(UploadPolicy::from_config(&config)),
        config: Arc::new(config),
    };

    Router::new()
        .route("/upload", post(handlers::upload::<S>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
