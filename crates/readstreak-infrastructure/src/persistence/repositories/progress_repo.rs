use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::persistence::SqliteRepositoryBase;
use readstreak_domain::progress::{ProgressEntry, ProgressRepository};
use readstreak_domain::shared::{BookId, DomainError, ProgressEntryId, SessionId, UserKey};

#[derive(FromRow)]
struct ProgressEntryRow {
    id: String,
    book_id: String,
    session_id: Option<String>,
    pages_read: i64,
    progress_at_ms: i64,
}

impl ProgressEntryRow {
    fn try_into_entry(self) -> Result<ProgressEntry, DomainError> {
        let pages_read = u32::try_from(self.pages_read).map_err(|_| {
            DomainError::DataIntegrity(format!(
                "Invalid pages_read {} for progress entry {}",
                self.pages_read, self.id
            ))
        })?;
        let progress_timestamp =
            DateTime::<Utc>::from_timestamp_millis(self.progress_at_ms).ok_or_else(|| {
                DomainError::DataIntegrity(format!(
                    "Invalid timestamp {} for progress entry {}",
                    self.progress_at_ms, self.id
                ))
            })?;

        Ok(ProgressEntry::restore(
            ProgressEntryId::from_string(&self.id),
            BookId::from_string(&self.book_id),
            self.session_id.as_deref().map(SessionId::from_string),
            pages_read,
            progress_timestamp,
        ))
    }
}

pub struct SqliteProgressRepository {
    base: SqliteRepositoryBase,
}

impl SqliteProgressRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl ProgressRepository for SqliteProgressRepository {
    async fn save(&self, user_key: &UserKey, entry: &ProgressEntry) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO progress_entries (
                id,
                user_key,
                book_id,
                session_id,
                pages_read,
                progress_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(entry.id().as_str())
                    .bind(user_key.as_str())
                    .bind(entry.book_id().as_str())
                    .bind(entry.session_id().map(|s| s.as_str().to_string()))
                    .bind(i64::from(entry.pages_read()))
                    .bind(entry.progress_timestamp().timestamp_millis()),
                "Save progress entry",
            )
            .await?;

        Ok(())
    }

    async fn list_all_entries(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ProgressEntry>, DomainError> {
        let query = r#"
            SELECT id, book_id, session_id, pages_read, progress_at_ms
            FROM progress_entries
            WHERE user_key = ?1
            ORDER BY progress_at_ms ASC, id ASC
        "#;

        let rows: Vec<ProgressEntryRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(user_key.as_str()),
                "List all progress entries",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_entry()).collect()
    }

    async fn list_entries_between(
        &self,
        user_key: &UserKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProgressEntry>, DomainError> {
        let query = r#"
            SELECT id, book_id, session_id, pages_read, progress_at_ms
            FROM progress_entries
            WHERE user_key = ?1
              AND progress_at_ms >= ?2
              AND progress_at_ms < ?3
            ORDER BY progress_at_ms ASC, id ASC
        "#;

        let rows: Vec<ProgressEntryRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query)
                    .bind(user_key.as_str())
                    .bind(start.timestamp_millis())
                    .bind(end.timestamp_millis()),
                "List progress entries in range",
            )
            .await?;

        rows.into_iter().map(|r| r.try_into_entry()).collect()
    }
}
