//! File Storage Port

use kernel::store::StoreResult;

/// Destination for validated uploads
#[trait_variant::make(FileStore: Send)]
pub trait LocalFileStore {
    /// Write `bytes` to `images/{subdir}/{filename}`
    ///
    /// Never overwrites; an existing file yields `StoreError::Conflict`.
    async fn save(&self, subdir: &str, filename: &str, bytes: &[u8]) -> StoreResult<()>;
}
