// src/storage/settings.rs
//! Key/value settings: API key, signup email

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::validation::validate_api_key;

pub const API_KEY: &str = "llm_api_key";
pub const USER_EMAIL: &str = "user_email";
pub const SIGNUP_DATE: &str = "signup_date";

pub struct SettingsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool)
            .await
            .with_context(|| format!("Failed to read setting: {}", key))?;
        Ok(value.map(|(v,)| v))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to write setting: {}", key))?;
        Ok(())
    }

    /// Returns whether a value was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to delete setting: {}", key))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn api_key(&self) -> Result<Option<String>> {
        self.get(API_KEY).await
    }

    /// Validate and store the LLM API key.
    pub async fn save_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if let Err(issue) = validate_api_key(key) {
            anyhow::bail!("{}", issue.message);
        }
        self.set(API_KEY, key).await
    }

    pub async fn delete_api_key(&self) -> Result<bool> {
        self.delete(API_KEY).await
    }

    /// Record the signup email and date.
    pub async fn sign_up(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if !email.contains('@') {
            anyhow::bail!("Please enter a valid email address");
        }
        self.set(USER_EMAIL, email).await?;
        self.set(SIGNUP_DATE, &Utc::now().to_rfc3339()).await
    }
}

/// Mask a key for display, keeping the first and last four characters.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;

    #[tokio::test]
    async fn test_set_get_overwrite_delete() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        assert_eq!(repo.get("k").await.unwrap(), None);
        repo.set("k", "one").await.unwrap();
        repo.set("k", "two").await.unwrap();
        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("two"));
        assert!(repo.delete("k").await.unwrap());
        assert!(!repo.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_api_key_validation() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        assert!(repo.save_api_key("   ").await.is_err());
        assert!(repo.save_api_key("short").await.is_err());
        repo.save_api_key(" AIzaSyD-abcdefghijklmnopqrst ").await.unwrap();
        assert_eq!(
            repo.api_key().await.unwrap().as_deref(),
            Some("AIzaSyD-abcdefghijklmnopqrst")
        );
        assert!(repo.delete_api_key().await.unwrap());
        assert_eq!(repo.api_key().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_up_requires_email() {
        let db = Database::in_memory().await.unwrap();
        let repo = SettingsRepository::new(db.pool());

        assert!(repo.sign_up("nobody").await.is_err());
        repo.sign_up("me@example.com").await.unwrap();
        assert_eq!(repo.get(USER_EMAIL).await.unwrap().as_deref(), Some("me@example.com"));
        assert!(repo.get(SIGNUP_DATE).await.unwrap().is_some());
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("abcdefghijkl"), "abcd****ijkl");
        assert_eq!(mask_api_key("short"), "*****");
    }
}
