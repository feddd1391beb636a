//! Upload Value Objects

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::AppError;

/// What an uploaded image is for; decides the storage sub-directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadType {
    UserAvatar,
    BabyAvatar,
}

impl UploadType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            UploadType::UserAvatar => "user_avatar",
            UploadType::BabyAvatar => "baby_avatar",
        }
    }

    /// Sub-directory under `images/`
    pub const fn subdir(&self) -> &'static str {
        match self {
            UploadType::UserAvatar => "users",
            UploadType::BabyAvatar => "babies",
        }
    }
}

impl fmt::Display for UploadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "user_avatar" => Ok(UploadType::UserAvatar),
            "baby_avatar" => Ok(UploadType::BabyAvatar),
            "" => Err(AppError::bad_request("missing upload type")),
            _ => Err(AppError::bad_request("unsupported upload type")),
        }
    }
}

/// Id of the record the file belongs to; becomes part of the filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedId(String);

impl RelatedId {
    pub const MAX_LENGTH: usize = 64;

    /// Blank input means "no related id"
    pub fn parse(value: Option<&str>) -> Result<Option<Self>, AppError> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let valid = value.len() <= Self::MAX_LENGTH
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(AppError::bad_request(format!(
                "related_id must be 1-{} characters of letters, digits, '_' or '-'",
                Self::MAX_LENGTH
            )));
        }

        Ok(Some(Self(value.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Where a saved file can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Absolute URL
    pub url: String,
    /// Path under the server root, `/uploads/images/{subdir}/{filename}`
    pub path: String,
    pub filename: String,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_type_parse() {
        assert_eq!("user_avatar".parse::<UploadType>().unwrap(), UploadType::UserAvatar);
        assert_eq!("baby_avatar".parse::<UploadType>().unwrap().subdir(), "babies");
        assert!("document".parse::<UploadType>().is_err());
        assert!("".parse::<UploadType>().is_err());
    }

    #[test]
    fn test_related_id() {
        assert!(RelatedId::parse(None).unwrap().is_none());
        assert!(RelatedId::parse(Some("  ")).unwrap().is_none());
        assert_eq!(
            RelatedId::parse(Some("baby-42_a")).unwrap().unwrap().as_str(),
            "baby-42_a"
        );
        assert!(RelatedId::parse(Some("../etc")).is_err());
        assert!(RelatedId::parse(Some("a b")).is_err());
        assert!(RelatedId::parse(Some(&"x".repeat(65))).is_err());
    }
}
