// src/storage/saved_cvs.rs
//! The saved CV list

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::app_log;
use crate::types::CvForm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCv {
    pub id: Uuid,
    pub name: String,
    pub form: CvForm,
    pub saved_at: DateTime<Utc>,
}

/// Listing entry without the form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCvSummary {
    pub id: Uuid,
    pub name: String,
    pub full_name: String,
    pub title: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct SavedCvRow {
    id: String,
    name: String,
    form_json: String,
    saved_at: DateTime<Utc>,
}

impl TryFrom<SavedCvRow> for SavedCv {
    type Error = anyhow::Error;

    fn try_from(row: SavedCvRow) -> Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&row.id)
                .with_context(|| format!("Corrupt saved CV id: {}", row.id))?,
            form: serde_json::from_str(&row.form_json)
                .with_context(|| format!("Corrupt saved CV data for: {}", row.name))?,
            name: row.name,
            saved_at: row.saved_at,
        })
    }
}

impl From<&SavedCv> for SavedCvSummary {
    fn from(saved: &SavedCv) -> Self {
        Self {
            id: saved.id,
            name: saved.name.clone(),
            full_name: saved.form.full_name.clone(),
            title: saved.form.title.clone(),
            saved_at: saved.saved_at,
        }
    }
}

impl SavedCv {
    /// File name used when exporting a saved entry as JSON.
    pub fn export_filename(&self) -> String {
        format!(
            "cv-data-{}-{}.json",
            crate::utils::sanitize_filename(&self.name),
            Utc::now().format("%Y-%m-%d")
        )
    }
}

pub struct SavedCvRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SavedCvRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Save form data under a display name. A blank name falls back to the
    /// person's name, then to "My CV Data".
    pub async fn save(&self, name: &str, form: &CvForm) -> Result<SavedCv> {
        let name = [name.trim(), form.full_name.trim()]
            .into_iter()
            .find(|n| !n.is_empty())
            .unwrap_or("My CV Data")
            .to_string();

        let saved = SavedCv {
            id: Uuid::new_v4(),
            name,
            form: form.clone(),
            saved_at: Utc::now(),
        };
        self.insert(&saved).await?;

        app_log!(info, "Saved CV data '{}' ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// Insert an entry as-is, replacing any entry with the same id.
    pub async fn insert(&self, saved: &SavedCv) -> Result<()> {
        let form_json = serde_json::to_string(&saved.form).context("Failed to serialize CV form")?;

        sqlx::query(
            "INSERT OR REPLACE INTO saved_cvs (id, name, form_json, saved_at) VALUES (?, ?, ?, ?)",
        )
        .bind(saved.id.to_string())
        .bind(&saved.name)
        .bind(form_json)
        .bind(saved.saved_at)
        .execute(self.pool)
        .await
        .context("Failed to store saved CV")?;
        Ok(())
    }

    /// All entries, newest first.
    pub async fn list(&self) -> Result<Vec<SavedCv>> {
        let rows: Vec<SavedCvRow> = sqlx::query_as(
            "SELECT id, name, form_json, saved_at FROM saved_cvs ORDER BY saved_at DESC",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list saved CVs")?;

        rows.into_iter().map(SavedCv::try_from).collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<SavedCv>> {
        let row: Option<SavedCvRow> = sqlx::query_as(
            "SELECT id, name, form_json, saved_at FROM saved_cvs WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to load saved CV")?;

        row.map(SavedCv::try_from).transpose()
    }

    /// Returns whether an entry was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_cvs WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete saved CV")?;
        Ok(result.rows_affected() > 0)
    }

    /// Import a previously exported entry. Keeps its id and timestamp.
    pub async fn import_json(&self, json: &str) -> Result<SavedCv> {
        let saved: SavedCv = serde_json::from_str(json).context("Invalid saved CV JSON")?;
        self.insert(&saved).await?;
        Ok(saved)
    }
}
