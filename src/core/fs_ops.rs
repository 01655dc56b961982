// src/core/fs_ops.rs
//! Async file system helpers with uniform error context

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        Self::write_bytes(path, content.as_bytes()).await
    }

    pub async fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(debug, "Written file: {}", path.display());
        Ok(())
    }

    pub async fn copy_file(src: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::copy(src, dest)
            .await
            .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;

        app_log!(debug, "Copied {} to {}", src.display(), dest.display());
        Ok(())
    }

    /// Read and deserialize a JSON document.
    pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = Self::read_file_safe(path).await?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in file: {}", path.display()))
    }

    /// Serialize to pretty JSON and write it.
    pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        Self::write_file_safe(path, &content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CvForm;

    #[tokio::test]
    async fn test_json_round_trip_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/form.json");
        let form = CvForm {
            full_name: "Grace Hopper".to_string(),
            ..Default::default()
        };

        FsOps::write_json(&path, &form).await.unwrap();
        let loaded: CvForm = FsOps::read_json(&path).await.unwrap();
        assert_eq!(loaded, form);
    }

    #[tokio::test]
    async fn test_read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        FsOps::write_file_safe(&path, "{ nope").await.unwrap();

        let err = FsOps::read_json::<CvForm>(&path).await.unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
