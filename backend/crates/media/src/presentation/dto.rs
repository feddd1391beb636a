//! Data Transfer Objects

use serde::Serialize;

use crate::domain::upload::StoredFile;

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
    pub filename: String,
    pub size: u64,
}

impl From<StoredFile> for UploadResponse {
    fn from(file: StoredFile) -> Self {
        Self {
            url: file.url,
            path: file.path,
            filename: file.filename,
            size: file.size,
        }
    }
}
