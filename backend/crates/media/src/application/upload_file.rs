//! Upload File Use Case
//!
//! Validates an upload, names it and hands it to the file store. Nothing
//! reaches the store unless every check passed.

use std::sync::Arc;

use chrono::Utc;
use platform::crypto::random_hex;
use platform::deadline::within;

use crate::application::config::UploadConfig;
use crate::application::policy::{UploadPolicy, stored_filename};
use crate::domain::storage::FileStore;
use crate::domain::upload::{RelatedId, StoredFile, UploadType};
use crate::error::{MediaError, MediaResult};

/// Upload file input
pub struct UploadFileInput {
    /// Raw `type` form value
    pub upload_type: String,
    pub related_id: Option<String>,
    /// Client-declared filename
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Upload file use case
pub struct UploadFileUseCase<S>
where
    S: FileStore,
{
    store: Arc<S>,
    policy: Arc<UploadPolicy>,
    config: Arc<UploadConfig>,
}

impl<S> UploadFileUseCase<S>
where
    S: FileStore + Send + Sync,
{
    pub fn new(store: Arc<S>, policy: Arc<UploadPolicy>, config: Arc<UploadConfig>) -> Self {
        Self {
            store,
            policy,
            config,
        }
    }

    pub async fn execute(&self, input: UploadFileInput) -> MediaResult<StoredFile> {
        let upload_type: UploadType = input.upload_type.parse()?;
        let related_id = RelatedId::parse(input.related_id.as_deref())?;
        let ext = self.policy.check_extension(&input.filename)?;

        let size = input.bytes.len() as u64;
        if size == 0 {
            return Err(MediaError::Validation("file cannot be empty".to_string()));
        }
        self.policy.check_size(size)?;

        let filename = stored_filename(
            upload_type,
            related_id.as_ref(),
            ext,
            Utc::now(),
            &random_hex(3),
        );

        within(
            "file save",
            self.config.call_timeout,
            self.store.save(upload_type.subdir(), &filename, &input.bytes),
        )
        .await??;

        let path = format!("/uploads/images/{}/{}", upload_type.subdir(), filename);
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);

        tracing::info!(
            upload_type = %upload_type,
            filename = %filename,
            size,
            "File uploaded"
        );

        Ok(StoredFile {
            url,
            path,
            filename,
            size,
        })
    }
}
