// src/image_validator.rs
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::app_log;

pub const MAX_PHOTO_BYTES: u64 = 5 * 1024 * 1024;

const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFormat {
    Png,
    Jpeg,
}

impl PhotoFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ImageValidationError {
    pub path: PathBuf,
    pub error_type: ImageErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageErrorType {
    FileNotFound,
    WrongFormat,
    EmptyFile,
    TooLarge,
    UnreadableFile,
}

impl ImageErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileNotFound => "IMAGE_NOT_FOUND",
            Self::WrongFormat => "IMAGE_WRONG_FORMAT",
            Self::EmptyFile => "IMAGE_EMPTY",
            Self::TooLarge => "IMAGE_TOO_LARGE",
            Self::UnreadableFile => "IMAGE_UNREADABLE",
        }
    }
}

pub struct ImageValidator;

impl ImageValidator {
    /// Check a profile photo on disk and return its format.
    pub async fn validate_photo(path: &Path) -> Result<PhotoFormat, ImageValidationError> {
        let fail = |error_type, message: String, suggestion: &str| ImageValidationError {
            path: path.to_path_buf(),
            error_type,
            message,
            suggestion: suggestion.to_string(),
        };

        if !path.exists() {
            return Err(fail(
                ImageErrorType::FileNotFound,
                format!("Profile photo not found: {}", path.display()),
                "Check the photo path",
            ));
        }

        let metadata = fs::metadata(path).await.map_err(|e| {
            fail(
                ImageErrorType::UnreadableFile,
                format!("Cannot read photo metadata: {}", e),
                "Check file permissions",
            )
        })?;

        if metadata.len() > MAX_PHOTO_BYTES {
            return Err(fail(
                ImageErrorType::TooLarge,
                format!(
                    "Image file too large: {:.1}MB (max 5MB)",
                    metadata.len() as f64 / 1024.0 / 1024.0
                ),
                "Please resize or compress your image and try again",
            ));
        }

        let bytes = fs::read(path).await.map_err(|e| {
            fail(
                ImageErrorType::UnreadableFile,
                format!("Cannot read photo: {}", e),
                "Check file permissions",
            )
        })?;

        Self::validate_bytes(&bytes).map_err(|(error_type, message)| {
            app_log!(warn, "Rejected photo {}: {}", path.display(), message);
            fail(error_type, message, "Please use a PNG or JPEG image")
        })
    }

    /// Size and signature checks for an in-memory photo.
    pub fn validate_bytes(bytes: &[u8]) -> Result<PhotoFormat, (ImageErrorType, String)> {
        if bytes.is_empty() {
            return Err((ImageErrorType::EmptyFile, "Profile photo is empty".to_string()));
        }
        if bytes.len() as u64 > MAX_PHOTO_BYTES {
            return Err((
                ImageErrorType::TooLarge,
                "Image file too large (max 5MB)".to_string(),
            ));
        }
        PhotoFormat::detect(bytes).ok_or((
            ImageErrorType::WrongFormat,
            "Please upload an image file (PNG or JPEG)".to_string(),
        ))
    }
}
