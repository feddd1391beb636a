//! Upload Policy
//!
//! Type and size rules applied to every upload before anything is stored.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::application::config::UploadConfig;
use crate::domain::upload::{RelatedId, UploadType};
use crate::error::{MediaError, MediaResult};

/// MIME type -> stored file extension
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
];

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_size: u64,
    allowed_extensions: Vec<&'static str>,
}

impl UploadPolicy {
    /// Unknown MIME types are ignored
    pub fn new(max_size: u64, allowed_types: &[String]) -> Self {
        let mut allowed_extensions = Vec::new();
        for mime in allowed_types {
            let mime = mime.trim().to_ascii_lowercase();
            if let Some((_, ext)) = MIME_EXTENSIONS.iter().find(|(m, _)| *m == mime) {
                if !allowed_extensions.contains(ext) {
                    allowed_extensions.push(*ext);
                }
            }
        }

        Self {
            max_size,
            allowed_extensions,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.max_size, &config.allowed_types)
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn allowed_extensions(&self) -> &[&'static str] {
        &self.allowed_extensions
    }

    /// Accepted extension (lowercase, with dot) of `filename`
    pub fn check_extension(&self, filename: &str) -> MediaResult<&'static str> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()));

        ext.and_then(|ext| {
            self.allowed_extensions
                .iter()
                .copied()
                .find(|allowed| *allowed == ext)
        })
        .ok_or_else(|| {
            MediaError::Validation(format!(
                "unsupported file type. Allowed types: {}",
                self.allowed_extensions.join(", ")
            ))
        })
    }

    pub fn check_size(&self, size: u64) -> MediaResult<()> {
        if size > self.max_size {
            return Err(MediaError::Validation(format!(
                "file size exceeds limit of {} bytes",
                self.max_size
            )));
        }
        Ok(())
    }
}

/// `{type}_{related}_{YYYYMMDD_HHMMSS}_{suffix}{ext}`; the related segment is
/// left out when there is none
pub fn stored_filename(
    upload_type: UploadType,
    related_id: Option<&RelatedId>,
    ext: &str,
    now: DateTime<Utc>,
    suffix: &str,
) -> String {
    let mut prefix = upload_type.as_str().to_string();
    if let Some(related) = related_id {
        prefix.push('_');
        prefix.push_str(related.as_str());
    }

    format!(
        "{}_{}_{}{}",
        prefix,
        now.format("%Y%m%d_%H%M%S"),
        suffix,
        ext
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn policy(types: &[&str]) -> UploadPolicy {
        let types: Vec<String> = types.iter().map(|t| t.to_string()).collect();
        UploadPolicy::new(1024, &types)
    }

    #[test]
    fn test_extensions_from_mime_types() {
        let p = policy(&["image/jpeg", "image/JPG", "image/png", "application/pdf"]);
        assert_eq!(p.allowed_extensions(), &[".jpg", ".png"]);
    }

    #[test]
    fn test_extension_case_insensitive() {
        let p = policy(&["image/jpeg", "image/png"]);
        assert_eq!(p.check_extension("photo.JPG").unwrap(), ".jpg");
        assert_eq!(p.check_extension("a.b.png").unwrap(), ".png");
    }

    #[test]
    fn test_extension_rejected() {
        let p = policy(&["image/jpeg", "image/png"]);
        for name in ["notes.txt", "photo", "photo.jpeg", ".png"] {
            let err = p.check_extension(name).unwrap_err();
            assert!(matches!(err, MediaError::Validation(ref m) if m.ends_with(".jpg, .png")));
        }
    }

    #[test]
    fn test_size_limit_inclusive() {
        let p = policy(&["image/png"]);
        assert!(p.check_size(1024).is_ok());
        assert!(p.check_size(1025).is_err());
    }

    #[test]
    fn test_stored_filename() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let related = RelatedId::parse(Some("42")).unwrap();

        assert_eq!(
            stored_filename(UploadType::BabyAvatar, related.as_ref(), ".png", now, "a1b2c3"),
            "baby_avatar_42_20240309_070501_a1b2c3.png"
        );
        assert_eq!(
            stored_filename(UploadType::UserAvatar, None, ".jpg", now, "a1b2c3"),
            "user_avatar_20240309_070501_a1b2c3.jpg"
        );
    }
}
