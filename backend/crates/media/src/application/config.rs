//! Application Configuration

use std::path::PathBuf;
use std::time::Duration;

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    pub max_size: u64,
    /// Accepted MIME types, e.g. `image/png`
    pub allowed_types: Vec<String>,
    /// Root directory of stored files
    pub storage_path: PathBuf,
    /// Public origin prefixed to returned paths, without trailing slash
    pub base_url: String,
    /// Upper bound for each storage call
    pub call_timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size: 10 * 1024 * 1024,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            storage_path: PathBuf::from("uploads"),
            base_url: "http://localhost:8080".to_string(),
            call_timeout: Duration::from_secs(5),
        }
    }
}
