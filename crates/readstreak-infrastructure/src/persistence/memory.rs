//! In-process stores with the same contract as the SQLite repositories.
//! Used by tests and by callers that do not need durability.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use readstreak_domain::progress::{ProgressEntry, ProgressRepository};
use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{DailyThreshold, StreakRecord, StreakStore, ThresholdChange};

#[derive(Default)]
pub struct InMemoryProgressRepository {
    entries: RwLock<HashMap<UserKey, Vec<ProgressEntry>>>,
}

impl InMemoryProgressRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted(mut entries: Vec<ProgressEntry>) -> Vec<ProgressEntry> {
    entries.sort_by(|a, b| {
        a.progress_timestamp()
            .cmp(&b.progress_timestamp())
            .then_with(|| a.id().as_str().cmp(b.id().as_str()))
    });
    entries
}

#[async_trait]
impl ProgressRepository for InMemoryProgressRepository {
    async fn save(&self, user_key: &UserKey, entry: &ProgressEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let user_entries = entries.entry(user_key.clone()).or_default();

        if user_entries.iter().any(|e| e.id() == entry.id()) {
            return Err(DomainError::Repository(format!(
                "Progress entry {} already exists",
                entry.id()
            )));
        }

        user_entries.push(entry.clone());
        Ok(())
    }

    async fn list_all_entries(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ProgressEntry>, DomainError> {
        let entries = self.entries.read().await;
        Ok(sorted(entries.get(user_key).cloned().unwrap_or_default()))
    }

    async fn list_entries_between(
        &self,
        user_key: &UserKey,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProgressEntry>, DomainError> {
        let entries = self.entries.read().await;
        let in_range = entries
            .get(user_key)
            .map(|list| {
                list.iter()
                    .filter(|e| e.progress_timestamp() >= start && e.progress_timestamp() < end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(sorted(in_range))
    }
}

#[derive(Default)]
pub struct InMemoryStreakStore {
    records: RwLock<HashMap<UserKey, StreakRecord>>,
    history: RwLock<HashMap<UserKey, Vec<ThresholdChange>>>,
}

impl InMemoryStreakStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StreakStore for InMemoryStreakStore {
    async fn get(&self, user_key: &UserKey) -> Result<Option<StreakRecord>, DomainError> {
        Ok(self.records.read().await.get(user_key).cloned())
    }

    async fn upsert(&self, record: &StreakRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(record.user_key().clone(), record.clone());
        Ok(())
    }

    async fn update_threshold(
        &self,
        user_key: &UserKey,
        threshold: DailyThreshold,
        effective_from: NaiveDate,
    ) -> Result<StreakRecord, DomainError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(user_key)
            .ok_or_else(|| DomainError::NotFound(format!("Streak record {}", user_key)))?;

        let previous = record.daily_threshold();
        if previous == threshold {
            return Ok(record.clone());
        }

        let mut history = self.history.write().await;
        let changes = history.entry(user_key.clone()).or_default();
        match changes
            .iter_mut()
            .find(|c| c.effective_from() == effective_from)
        {
            Some(existing) => {
                *existing = ThresholdChange::new(effective_from, existing.previous(), threshold)
            }
            None => {
                changes.push(ThresholdChange::new(effective_from, previous, threshold));
                changes.sort_by_key(|c| c.effective_from());
            }
        }

        record.set_daily_threshold(threshold);
        Ok(record.clone())
    }

    async fn threshold_history(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ThresholdChange>, DomainError> {
        Ok(self
            .history
            .read()
            .await
            .get(user_key)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use readstreak_domain::shared::BookId;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[tokio::test]
    async fn test_entries_are_listed_in_time_order() {
        let repo = InMemoryProgressRepository::new();
        let user = UserKey::from_string("reader");
        let book = BookId::new();

        repo.save(&user, &ProgressEntry::new(book.clone(), None, 3, at(2, 9)))
            .await
            .unwrap();
        repo.save(&user, &ProgressEntry::new(book, None, 5, at(1, 9)))
            .await
            .unwrap();

        let listed = repo.list_all_entries(&user).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].pages_read(), 5);
        assert_eq!(listed[1].pages_read(), 3);
    }

    #[tokio::test]
    async fn test_range_end_is_exclusive() {
        let repo = InMemoryProgressRepository::new();
        let user = UserKey::from_string("reader");

        repo.save(&user, &ProgressEntry::new(BookId::new(), None, 1, at(1, 0)))
            .await
            .unwrap();
        repo.save(&user, &ProgressEntry::new(BookId::new(), None, 2, at(2, 0)))
            .await
            .unwrap();

        let listed = repo.list_entries_between(&user, at(1, 0), at(2, 0)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].pages_read(), 1);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let repo = InMemoryProgressRepository::new();
        repo.save(
            &UserKey::from_string("a"),
            &ProgressEntry::new(BookId::new(), None, 4, at(1, 8)),
        )
        .await
        .unwrap();

        let other = repo
            .list_all_entries(&UserKey::from_string("b"))
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_update_threshold_requires_record() {
        let store = InMemoryStreakStore::new();
        let result = store
            .update_threshold(
                &UserKey::single_tenant(),
                DailyThreshold::new(5).unwrap(),
                date(1),
            )
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_same_day_threshold_changes_keep_original_previous() {
        let store = InMemoryStreakStore::new();
        let user = UserKey::single_tenant();
        store
            .get_or_create(&user, DailyThreshold::DEFAULT)
            .await
            .unwrap();

        store
            .update_threshold(&user, DailyThreshold::new(10).unwrap(), date(3))
            .await
            .unwrap();
        let record = store
            .update_threshold(&user, DailyThreshold::new(20).unwrap(), date(3))
            .await
            .unwrap();

        assert_eq!(record.daily_threshold().value(), 20);
        let history = store.threshold_history(&user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].previous(), DailyThreshold::DEFAULT);
        assert_eq!(history[0].threshold().value(), 20);
    }
}
