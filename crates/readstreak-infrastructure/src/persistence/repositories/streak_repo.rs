use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{
    DailyThreshold, StreakRecord, StreakStats, StreakStore, ThresholdChange,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(FromRow)]
struct StreakRecordRow {
    user_key: String,
    current_streak: i64,
    longest_streak: i64,
    last_activity_date: Option<String>,
    streak_start_date: Option<String>,
    total_days_active: i64,
    daily_threshold: i64,
    streak_enabled: bool,
}

impl StreakRecordRow {
    fn try_into_record(self) -> Result<StreakRecord, DomainError> {
        let stats = StreakStats {
            current_streak: to_count("current_streak", self.current_streak)?,
            longest_streak: to_count("longest_streak", self.longest_streak)?,
            last_activity_date: parse_date(self.last_activity_date.as_deref())?,
            streak_start_date: parse_date(self.streak_start_date.as_deref())?,
            total_days_active: to_count("total_days_active", self.total_days_active)?,
        };

        StreakRecord::restore(
            UserKey::from_string(&self.user_key),
            stats,
            to_threshold(self.daily_threshold)?,
            self.streak_enabled,
        )
    }
}

#[derive(FromRow)]
struct ThresholdChangeRow {
    effective_from: String,
    previous_threshold: i64,
    threshold: i64,
}

impl ThresholdChangeRow {
    fn try_into_change(self) -> Result<ThresholdChange, DomainError> {
        let effective_from = parse_date(Some(&self.effective_from))?.ok_or_else(|| {
            DomainError::DataIntegrity("Threshold change without effective date".to_string())
        })?;

        Ok(ThresholdChange::new(
            effective_from,
            to_threshold(self.previous_threshold)?,
            to_threshold(self.threshold)?,
        ))
    }
}

fn to_count(column: &str, value: i64) -> Result<u32, DomainError> {
    u32::try_from(value)
        .map_err(|_| DomainError::DataIntegrity(format!("Invalid {}: {}", column, value)))
}

fn to_threshold(value: i64) -> Result<DailyThreshold, DomainError> {
    DailyThreshold::try_from(value)
        .map_err(|e| DomainError::DataIntegrity(format!("Stored threshold {}: {}", value, e)))
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    value
        .map(|raw| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                DomainError::DataIntegrity(format!("Invalid stored date: {} ({})", raw, e))
            })
        })
        .transpose()
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

pub struct SqliteStreakStore {
    base: SqliteRepositoryBase,
}

impl SqliteStreakStore {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl StreakStore for SqliteStreakStore {
    async fn get(&self, user_key: &UserKey) -> Result<Option<StreakRecord>, DomainError> {
        let query = r#"
            SELECT
                user_key,
                current_streak,
                longest_streak,
                last_activity_date,
                streak_start_date,
                total_days_active,
                daily_threshold,
                streak_enabled
            FROM streak_records
            WHERE user_key = ?1
        "#;

        let row: Option<StreakRecordRow> = self
            .base
            .fetch_optional(
                sqlx::query_as(query).bind(user_key.as_str()),
                "Find streak record",
            )
            .await?;

        row.map(|r| r.try_into_record()).transpose()
    }

    async fn upsert(&self, record: &StreakRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO streak_records (
                user_key,
                current_streak,
                longest_streak,
                last_activity_date,
                streak_start_date,
                total_days_active,
                daily_threshold,
                streak_enabled,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
            ON CONFLICT(user_key) DO UPDATE SET
                current_streak = excluded.current_streak,
                longest_streak = excluded.longest_streak,
                last_activity_date = excluded.last_activity_date,
                streak_start_date = excluded.streak_start_date,
                total_days_active = excluded.total_days_active,
                daily_threshold = excluded.daily_threshold,
                streak_enabled = excluded.streak_enabled,
                updated_at = excluded.updated_at
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(record.user_key().as_str())
                    .bind(i64::from(record.current_streak()))
                    .bind(i64::from(record.longest_streak()))
                    .bind(format_date(record.last_activity_date()))
                    .bind(format_date(record.streak_start_date()))
                    .bind(i64::from(record.total_days_active()))
                    .bind(i64::from(record.daily_threshold().value()))
                    .bind(record.streak_enabled()),
                "Upsert streak record",
            )
            .await?;

        Ok(())
    }

    async fn update_threshold(
        &self,
        user_key: &UserKey,
        threshold: DailyThreshold,
        effective_from: NaiveDate,
    ) -> Result<StreakRecord, DomainError> {
        let mut record = self
            .get(user_key)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Streak record {}", user_key)))?;

        let previous = record.daily_threshold();
        if previous == threshold {
            return Ok(record);
        }

        let mut tx = self
            .base
            .pool()
            .begin()
            .await
            .map_err(|e| DomainError::Repository(format!("Begin threshold update: {e}")))?;

        sqlx::query(
            r#"
            UPDATE streak_records
            SET daily_threshold = ?2, updated_at = datetime('now')
            WHERE user_key = ?1
            "#,
        )
        .bind(user_key.as_str())
        .bind(i64::from(threshold.value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Repository(format!("Update daily threshold: {e}")))?;

        // A later change on the same day keeps the value the day started with
        sqlx::query(
            r#"
            INSERT INTO threshold_changes (user_key, effective_from, previous_threshold, threshold)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_key, effective_from) DO UPDATE SET
                threshold = excluded.threshold
            "#,
        )
        .bind(user_key.as_str())
        .bind(effective_from.format(DATE_FORMAT).to_string())
        .bind(i64::from(previous.value()))
        .bind(i64::from(threshold.value()))
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::Repository(format!("Record threshold change: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::Repository(format!("Commit threshold update: {e}")))?;

        record.set_daily_threshold(threshold);
        Ok(record)
    }

    async fn threshold_history(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ThresholdChange>, DomainError> {
        let query = r#"
            SELECT effective_from, previous_threshold, threshold
            FROM threshold_changes
            WHERE user_key = ?1
            ORDER BY effective_from ASC
        "#;

        let rows: Vec<ThresholdChangeRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(user_key.as_str()),
                "List threshold changes",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_change()).collect()
    }
}
