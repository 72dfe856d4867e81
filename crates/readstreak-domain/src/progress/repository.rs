use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::ProgressEntry;
use crate::calendar::DayBoundary;
use crate::shared::{DomainError, UserKey};

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Append a progress entry for a user.
    async fn save(&self, user_key: &UserKey, entry: &ProgressEntry) -> Result<(), DomainError>;

    /// Full history for a user, ordered by timestamp.
    async fn list_all_entries(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ProgressEntry>, DomainError>;

    /// Entries with `start <= progress_timestamp < end`, ordered by timestamp.
    async fn list_entries_between(
        &self,
        user_key: &UserKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProgressEntry>, DomainError>;

    /// Entries whose local date under `boundary` is `date`.
    async fn list_entries_for_date(
        &self,
        user_key: &UserKey,
        date: NaiveDate,
        boundary: &DayBoundary,
    ) -> Result<Vec<ProgressEntry>, DomainError> {
        let (start, end) = boundary.day_range(date);
        self.list_entries_between(user_key, start, end).await
    }
}
