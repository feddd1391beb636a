//! Domain Layer
//!
//! Upload value objects and the file storage port.

pub mod storage;
pub mod upload;

pub use storage::FileStore;
pub use upload::{RelatedId, StoredFile, UploadType};
