//! HTTP Handlers

use std::sync::Arc;

use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::State;
use kernel::response::ApiResponse;

use crate::application::{UploadConfig, UploadFileInput, UploadFileUseCase, UploadPolicy};
use crate::domain::storage::FileStore;
use crate::error::{MediaError, MediaResult};
use crate::presentation::dto::UploadResponse;

/// Application state for media handlers
pub struct MediaAppState<S>
where
    S: FileStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub policy: Arc<UploadPolicy>,
    pub config: Arc<UploadConfig>,
}

impl<S> Clone for MediaAppState<S>
where
    S: FileStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /upload
///
/// Multipart fields: `type`, optional `related_id`, `file`.
pub async fn upload<S>(
    State(state): State<MediaAppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> MediaResult<ApiResponse<UploadResponse>>
where
    S: FileStore + Send + Sync + 'static,
{
    let mut multipart = multipart.map_err(|e| MediaError::Validation(e.body_text()))?;

    let mut upload_type = None;
    let mut related_id = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "type" => upload_type = Some(field.text().await.map_err(invalid_form)?),
            "related_id" => related_id = Some(field.text().await.map_err(invalid_form)?),
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = read_limited(field, &state.policy).await?;
                file = Some((filename, bytes));
            }
            _ => {}
        }
    }

    let upload_type = upload_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| MediaError::Validation("missing upload type".to_string()))?;
    let (filename, bytes) =
        file.ok_or_else(|| MediaError::Validation("please select a file to upload".to_string()))?;

    let use_case =
        UploadFileUseCase::new(state.store.clone(), state.policy.clone(), state.config.clone());

    let stored = use_case
        .execute(UploadFileInput {
            upload_type,
            related_id,
            filename,
            bytes,
        })
        .await?;

    Ok(ApiResponse::success(UploadResponse::from(stored)))
}

/// Buffer a file field, giving up as soon as it outgrows the size limit
async fn read_limited(mut field: Field<'_>, policy: &UploadPolicy) -> MediaResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(invalid_form)? {
        policy.check_size((bytes.len() + chunk.len()) as u64)?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> MediaError {
    MediaError::Validation(format!("invalid multipart form: {}", err.body_text()))
}
