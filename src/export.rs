// src/export.rs
//! Turning a CV record into a downloadable file
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_log;
use crate::core::template_engine::TemplateInfo;
use crate::core::FsOps;
use crate::render::{render_html, render_markdown, render_typst, Customization};
use crate::types::CvRecord;
use crate::utils::{export_filename, is_http_url};
use crate::workspace::{TypstOutput, Workspace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Html,
    Json,
    Markdown,
    Pdf,
    Png,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
            Self::Markdown => "text/markdown; charset=utf-8",
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "png" | "image" => Ok(Self::Png),
            "docx" | "word" => Ok(Self::Docx),
            other => anyhow::bail!(
                "Unsupported export format: {} (expected html, json, markdown, pdf, png or docx)",
                other
            ),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            other => other.extension(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

impl ExportedFile {
    /// Write into `dir` under the export's own file name.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        FsOps::write_bytes(&path, &self.bytes).await?;
        app_log!(info, "Exported {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Everything an export needs besides the format.
pub struct ExportJob<'a> {
    pub record: &'a CvRecord,
    pub template: &'a TemplateInfo,
    pub customization: &'a Customization,
    /// A URL for HTML previews, or a local file for PDF/PNG.
    pub photo: Option<&'a str>,
}

impl ExportJob<'_> {
    pub async fn export(&self, format: ExportFormat) -> Result<ExportedFile> {
        app_log!(
            info,
            "Exporting {} as {} with template {}",
            self.record.header.name,
            format,
            self.template.id
        );

        let bytes = match format {
            ExportFormat::Html => self.html().into_bytes(),
            ExportFormat::Json => {
                serde_json::to_vec_pretty(self.record).context("Failed to serialize CV")?
            }
            ExportFormat::Markdown => render_markdown(self.record).into_bytes(),
            ExportFormat::Pdf => self.typst(TypstOutput::Pdf).await?,
            ExportFormat::Png => self.typst(TypstOutput::Png).await?,
            ExportFormat::Docx => {
                let workspace = Workspace::new()?;
                workspace
                    .markdown_to_docx(&render_markdown(self.record))
                    .await?
            }
        };

        Ok(ExportedFile {
            bytes,
            filename: export_filename(&self.record.header.name, format.extension()),
            content_type: format.content_type(),
        })
    }

    pub fn html(&self) -> String {
        render_html(self.record, self.template, self.customization, self.photo)
    }

    async fn typst(&self, output: TypstOutput) -> Result<Vec<u8>> {
        let workspace = Workspace::new()?;

        let photo = match self.photo.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) if !is_http_url(p) && !p.starts_with("data:") => {
                workspace.add_photo(Path::new(p)).await?
            }
            Some(_) => {
                app_log!(debug, "Remote photos are not embedded in Typst exports");
                None
            }
            None => None,
        };

        let source = render_typst(self.record, self.template, self.customization, photo.as_deref());
        workspace.compile_typst(&source, output).await
    }
}
