// src/storage/usage.rs
//! Daily generation credits and one-time affiliation codes

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::app_log;

/// Codes that grant bonus generations. Each can be redeemed once.
pub const AFFILIATION_CODES: &[&str] = &[
    "WELCOME2025",
    "EARLY100",
    "REFER1",
    "REFER2",
    "REFER3",
    "REFER4",
    "REFER5",
    "REFER6",
    "REFER7",
    "REFER8",
];

pub const CODE_BONUS: u32 = 5;

#[derive(Debug, Error)]
pub enum CreditError {
    #[error("Daily generation limit reached ({per_day} per day). Try again tomorrow or redeem an affiliation code.")]
    QuotaExceeded { per_day: u32 },

    #[error("Please enter an affiliation code")]
    EmptyCode,

    #[error("Invalid affiliation code. Please check and try again.")]
    InvalidCode,

    #[error("This code has already been used. Each code can only be used once.")]
    CodeAlreadyUsed,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CreditError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            Self::EmptyCode => "EMPTY_CODE",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreditStatus {
    pub day: NaiveDate,
    pub used: u32,
    pub per_day: u32,
    pub remaining: u32,
}

pub struct UsageTracker<'a> {
    pool: &'a SqlitePool,
    per_day: u32,
}

impl<'a> UsageTracker<'a> {
    pub fn new(pool: &'a SqlitePool, per_day: u32) -> Self {
        Self { pool, per_day }
    }

    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn status(&self, day: NaiveDate) -> Result<CreditStatus, CreditError> {
        let used = self.used_on(day).await?;
        Ok(self.status_from(day, used))
    }

    /// Count one generation against `day`, refusing when no credits remain.
    pub async fn consume(&self, day: NaiveDate) -> Result<CreditStatus, CreditError> {
        let status = self.status(day).await?;
        if status.remaining == 0 {
            return Err(CreditError::QuotaExceeded {
                per_day: self.per_day,
            });
        }

        sqlx::query(
            "INSERT INTO usage (day, generations_used) VALUES (?, 1) \
             ON CONFLICT(day) DO UPDATE SET generations_used = generations_used + 1",
        )
        .bind(day.to_string())
        .execute(self.pool)
        .await
        .context("Failed to record generation")?;

        Ok(self.status_from(day, status.used + 1))
    }

    /// Clear the generations counted on `day`. Signing up starts the day fresh.
    pub async fn reset(&self, day: NaiveDate) -> Result<CreditStatus, CreditError> {
        sqlx::query(
            "INSERT INTO usage (day, generations_used) VALUES (?, 0) \
             ON CONFLICT(day) DO UPDATE SET generations_used = 0",
        )
        .bind(day.to_string())
        .execute(self.pool)
        .await
        .context("Failed to reset usage")?;

        Ok(self.status_from(day, 0))
    }

    /// Redeem an affiliation code: case-insensitive, once per code, and
    /// worth `CODE_BONUS` generations on `day`.
    pub async fn redeem(&self, code: &str, day: NaiveDate) -> Result<CreditStatus, CreditError> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CreditError::EmptyCode);
        }
        if !AFFILIATION_CODES.contains(&code.as_str()) {
            return Err(CreditError::InvalidCode);
        }

        // The code is only marked used if the bonus lands with it.
        let mut tx = self.pool.begin().await.context("Failed to start transaction")?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO redeemed_codes (code, redeemed_at) VALUES (?, ?)",
        )
        .bind(&code)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .context("Failed to record redeemed code")?;

        if inserted.rows_affected() == 0 {
            return Err(CreditError::CodeAlreadyUsed);
        }

        let (used,): (i64,) = sqlx::query_as(
            "INSERT INTO usage (day, generations_used) VALUES (?, 0) \
             ON CONFLICT(day) DO UPDATE SET generations_used = MAX(generations_used - ?, 0) \
             RETURNING generations_used",
        )
        .bind(day.to_string())
        .bind(CODE_BONUS as i64)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to apply code bonus")?;

        tx.commit().await.context("Failed to commit redeemed code")?;

        let used = used.max(0) as u32;
        app_log!(info, "Redeemed affiliation code {}", code);
        Ok(self.status_from(day, used))
    }

    async fn used_on(&self, day: NaiveDate) -> anyhow::Result<u32> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT generations_used FROM usage WHERE day = ?")
                .bind(day.to_string())
                .fetch_optional(self.pool)
                .await
                .context("Failed to read usage")?;
        Ok(row.map(|(used,)| used.max(0) as u32).unwrap_or(0))
    }

    fn status_from(&self, day: NaiveDate, used: u32) -> CreditStatus {
        CreditStatus {
            day,
            used,
            per_day: self.per_day,
            remaining: self.per_day.saturating_sub(used),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_consume_until_quota() {
        let db = Database::in_memory().await.unwrap();
        let tracker = UsageTracker::new(db.pool(), 2);

        assert_eq!(tracker.consume(day(1)).await.unwrap().remaining, 1);
        assert_eq!(tracker.consume(day(1)).await.unwrap().remaining, 0);
        assert!(matches!(
            tracker.consume(day(1)).await,
            Err(CreditError::QuotaExceeded { per_day: 2 })
        ));

        // A new day starts fresh
        assert_eq!(tracker.status(day(2)).await.unwrap().remaining, 2);
    }

    #[tokio::test]
    async fn test_redeem_code_once_and_floor_at_zero() {
        let db = Database::in_memory().await.unwrap();
        let tracker = UsageTracker::new(db.pool(), 5);

        for _ in 0..5 {
            tracker.consume(day(3)).await.unwrap();
        }
        let status = tracker.redeem(" welcome2025 ", day(3)).await.unwrap();
        assert_eq!(status.used, 0);
        assert_eq!(status.remaining, 5);

        assert!(matches!(
            tracker.redeem("WELCOME2025", day(3)).await,
            Err(CreditError::CodeAlreadyUsed)
        ));

        // Used count never drops below zero
        let status = tracker.redeem("REFER1", day(3)).await.unwrap();
        assert_eq!(status.used, 0);
    }

    #[tokio::test]
    async fn test_reset_clears_only_that_day() {
        let db = Database::in_memory().await.unwrap();
        let tracker = UsageTracker::new(db.pool(), 3);

        tracker.consume(day(6)).await.unwrap();
        tracker.consume(day(7)).await.unwrap();
        tracker.consume(day(7)).await.unwrap();

        assert_eq!(tracker.reset(day(7)).await.unwrap().remaining, 3);
        assert_eq!(tracker.status(day(7)).await.unwrap().used, 0);
        assert_eq!(tracker.status(day(6)).await.unwrap().used, 1);
    }

    #[tokio::test]
    async fn test_redeem_rejects_unknown_and_empty() {
        let db = Database::in_memory().await.unwrap();
        let tracker = UsageTracker::new(db.pool(), 5);

        assert!(matches!(
            tracker.redeem("", day(4)).await,
            Err(CreditError::EmptyCode)
        ));
        let err = tracker.redeem("FREE", day(4)).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_CODE");
    }

    #[tokio::test]
    async fn test_failed_bonus_leaves_code_unused() {
        let db = Database::in_memory().await.unwrap();
        let tracker = UsageTracker::new(db.pool(), 5);

        sqlx::query("DROP TABLE usage").execute(db.pool()).await.unwrap();
        let err = tracker.redeem("EARLY100", day(5)).await.unwrap_err();
        assert_eq!(err.code(), "STORAGE_ERROR");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM redeemed_codes")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);

        sqlx::query("CREATE TABLE usage (day TEXT PRIMARY KEY, generations_used INTEGER NOT NULL DEFAULT 0)")
            .execute(db.pool())
            .await
            .unwrap();
        let status = tracker.redeem("EARLY100", day(5)).await.unwrap();
        assert_eq!(status.remaining, 5);
    }
}
