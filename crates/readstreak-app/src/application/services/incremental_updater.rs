use chrono::NaiveDate;
use log::{debug, info};
use std::sync::Arc;

use super::RebuildOrchestrator;
use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::progress::{ProgressAggregator, ProgressRepository};
use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{StreakCalculator, StreakRecord, StreakStore};

/// Folds a single day's reading into the stored record without touching the
/// rest of the history.
///
/// Falls back to a rebuild when there is nothing to advance from (no record
/// yet) or when `today` is earlier than the record's last activity.
pub struct IncrementalUpdater {
    progress_repo: Arc<dyn ProgressRepository>,
    streak_store: Arc<dyn StreakStore>,
    boundary: DayBoundary,
    rebuild: Arc<RebuildOrchestrator>,
}

impl IncrementalUpdater {
    pub fn new(
        progress_repo: Arc<dyn ProgressRepository>,
        streak_store: Arc<dyn StreakStore>,
        boundary: DayBoundary,
        rebuild: Arc<RebuildOrchestrator>,
    ) -> Self {
        Self {
            progress_repo,
            streak_store,
            boundary,
            rebuild,
        }
    }

    pub async fn update(
        &self,
        user_key: &UserKey,
        today: NaiveDate,
    ) -> Result<StreakRecord, DomainError> {
        let Some(mut record) = self.streak_store.get(user_key).await? else {
            debug!("No streak record for {}, rebuilding", user_key);
            return self.rebuild.rebuild(user_key, today, false).await;
        };

        let entries = self
            .progress_repo
            .list_entries_for_date(user_key, today, &self.boundary)
            .await?;
        let today_total = ProgressAggregator::total_for_date(&entries, today, &self.boundary);

        let Some(stats) = StreakCalculator::advance(
            &record.stats(),
            today,
            today_total,
            record.daily_threshold(),
        ) else {
            info!(
                "Day {} precedes last activity of {}, rebuilding",
                today, user_key
            );
            return self.rebuild.rebuild(user_key, today, false).await;
        };

        if stats == record.stats() {
            return Ok(record);
        }

        record.apply_stats(stats);
        self.streak_store.upsert(&record).await?;

        debug!(
            "Advanced streak for {} on {}: pages={} current={} longest={}",
            user_key,
            today,
            today_total,
            record.current_streak(),
            record.longest_streak()
        );

        Ok(record)
    }
}
