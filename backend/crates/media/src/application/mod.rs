//! Application Layer

pub mod config;
pub mod policy;
pub mod upload_file;

pub use config::UploadConfig;
pub use policy::UploadPolicy;
pub use upload_file::{UploadFileInput, UploadFileUseCase};
