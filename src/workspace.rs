// src/workspace.rs
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tempfile::TempDir;
use tokio::process::Command;

use crate::app_log;
use crate::core::FsOps;
use crate::image_validator::ImageValidator;

const MAIN_SOURCE: &str = "main.typ";
const PHOTO_STEM: &str = "profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypstOutput {
    Pdf,
    /// First page only.
    Png,
}

/// Scratch directory for one export, removed on drop.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("cvcraft-")
            .tempdir()
            .context("Failed to create temporary workspace")?;
        app_log!(debug, "Workspace created at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Copy a local profile photo in. Returns its name inside the workspace,
    /// or `None` when the file does not pass validation.
    pub async fn add_photo(&self, source: &Path) -> Result<Option<String>> {
        let format = match ImageValidator::validate_photo(source).await {
            Ok(format) => format,
            Err(e) => {
                app_log!(warn, "Skipping profile photo: {} ({})", e, e.suggestion);
                return Ok(None);
            }
        };

        let name = format!("{}.{}", PHOTO_STEM, format.extension());
        FsOps::copy_file(source, &self.path().join(&name)).await?;
        Ok(Some(name))
    }

    pub async fn compile_typst(&self, source: &str, output: TypstOutput) -> Result<Vec<u8>> {
        let main = self.path().join(MAIN_SOURCE);
        FsOps::write_file_safe(&main, source).await?;

        let (target, produced) = match output {
            TypstOutput::Pdf => ("cv.pdf", "cv.pdf"),
            TypstOutput::Png => ("page-{p}.png", "page-1.png"),
        };

        run_tool(
            "typst",
            &["compile", MAIN_SOURCE, target],
            self.path(),
            "Install Typst (https://typst.app) and make sure `typst` is on your PATH.",
        )
        .await?;

        read_output(&self.path().join(produced)).await
    }

    /// Markdown to Word through pandoc.
    pub async fn markdown_to_docx(&self, markdown: &str) -> Result<Vec<u8>> {
        FsOps::write_file_safe(&self.path().join("cv.md"), markdown).await?;

        run_tool(
            "pandoc",
            &["cv.md", "--from", "markdown", "--to", "docx", "--output", "cv.docx"],
            self.path(),
            "Install pandoc (https://pandoc.org) and make sure `pandoc` is on your PATH.",
        )
        .await?;

        read_output(&self.path().join("cv.docx")).await
    }
}

async fn run_tool(program: &str, args: &[&str], dir: &Path, install_hint: &str) -> Result<()> {
    app_log!(debug, "Running {} {}", program, args.join(" "));

    let output = match Command::new(program).args(args).current_dir(dir).output().await {
        Ok(output) => output,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            anyhow::bail!("`{}` was not found. {}", program, install_hint)
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to execute {}", program)),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        app_log!(error, "{} failed: {}", program, stderr.trim());
        anyhow::bail!(
            "{} failed: stderr={}, stdout={}",
            program,
            stderr.trim(),
            stdout.trim()
        );
    }
    Ok(())
}

async fn read_output(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Expected output not produced: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let workspace = Workspace::new().unwrap();
        let err = run_tool("cvcraft-no-such-tool", &[], workspace.path(), "Install it.")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "`cvcraft-no-such-tool` was not found. Install it.");
    }

    #[tokio::test]
    async fn test_photo_copied_only_when_valid() {
        let scratch = tempfile::tempdir().unwrap();
        let good = scratch.path().join("me.png");
        let bad = scratch.path().join("me.gif");
        tokio::fs::write(&good, PNG).await.unwrap();
        tokio::fs::write(&bad, b"GIF89a").await.unwrap();

        let workspace = Workspace::new().unwrap();
        assert_eq!(workspace.add_photo(&good).await.unwrap().as_deref(), Some("profile.png"));
        assert!(workspace.path().join("profile.png").exists());
        assert_eq!(workspace.add_photo(&bad).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_workspace_removed_on_drop() {
        let workspace = Workspace::new().unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.exists());
        drop(workspace);
        assert!(!path.exists());
    }
}
