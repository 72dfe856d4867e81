use async_trait::async_trait;
use chrono::NaiveDate;

use super::{DailyThreshold, StreakRecord, ThresholdChange};
use crate::shared::{DomainError, UserKey};

#[async_trait]
pub trait StreakStore: Send + Sync {
    async fn get(&self, user_key: &UserKey) -> Result<Option<StreakRecord>, DomainError>;

    /// Insert or fully overwrite the record for `record.user_key()`.
    async fn upsert(&self, record: &StreakRecord) -> Result<(), DomainError>;

    /// Set the current threshold and log the change as effective from
    /// `effective_from`. A second change on the same date keeps the value the
    /// day started with as `previous`.
    ///
    /// Fails with `NotFound` when the user has no record.
    async fn update_threshold(
        &self,
        user_key: &UserKey,
        threshold: DailyThreshold,
        effective_from: NaiveDate,
    ) -> Result<StreakRecord, DomainError>;

    /// Threshold changes ordered by effective date.
    async fn threshold_history(
        &self,
        user_key: &UserKey,
    ) -> Result<Vec<ThresholdChange>, DomainError>;

    /// Load the record, creating and persisting a zeroed one if missing.
    async fn get_or_create(
        &self,
        user_key: &UserKey,
        default_threshold: DailyThreshold,
    ) -> Result<StreakRecord, DomainError> {
        if let Some(record) = self.get(user_key).await? {
            return Ok(record);
        }

        let record = StreakRecord::new(user_key.clone(), default_threshold);
        self.upsert(&record).await?;
        Ok(record)
    }
}
