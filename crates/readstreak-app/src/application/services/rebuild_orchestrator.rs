use chrono::NaiveDate;
use log::info;
use std::sync::Arc;
use std::time::Instant;

use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::progress::{ProgressAggregator, ProgressRepository};
use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{
    DailyThreshold, StreakCalculator, StreakRecord, StreakStore, ThresholdSchedule,
};

/// Full recomputation of a user's streak from the whole progress history.
///
/// Each day is judged against the threshold that was in effect on that day,
/// so a threshold change never rewrites days that already passed. The
/// stored record is replaced with a single upsert.
pub struct RebuildOrchestrator {
    progress_repo: Arc<dyn ProgressRepository>,
    streak_store: Arc<dyn StreakStore>,
    boundary: DayBoundary,
    default_threshold: DailyThreshold,
}

impl RebuildOrchestrator {
    pub fn new(
        progress_repo: Arc<dyn ProgressRepository>,
        streak_store: Arc<dyn StreakStore>,
        boundary: DayBoundary,
        default_threshold: DailyThreshold,
    ) -> Self {
        Self {
            progress_repo,
            streak_store,
            boundary,
            default_threshold,
        }
    }

    pub async fn rebuild(
        &self,
        user_key: &UserKey,
        as_of: NaiveDate,
        enable_tracking: bool,
    ) -> Result<StreakRecord, DomainError> {
        let started = Instant::now();

        let mut record = self
            .streak_store
            .get(user_key)
            .await?
            .unwrap_or_else(|| StreakRecord::new(user_key.clone(), self.default_threshold));

        let entries = self.progress_repo.list_all_entries(user_key).await?;
        let aggregates = ProgressAggregator::aggregate(&entries, &self.boundary);

        let history = self.streak_store.threshold_history(user_key).await?;
        let schedule = ThresholdSchedule::new(history, record.daily_threshold());

        let stats = StreakCalculator::calculate(&aggregates, &schedule, as_of)?;
        record.apply_stats(stats);
        if enable_tracking {
            record.set_streak_enabled(true);
        }

        self.streak_store.upsert(&record).await?;

        info!(
            "Rebuilt streak for {}: {} entries over {} days as of {}, \
             current={} longest={} total_days={} ({:?})",
            user_key,
            entries.len(),
            aggregates.len(),
            as_of,
            record.current_streak(),
            record.longest_streak(),
            record.total_days_active(),
            started.elapsed()
        );

        Ok(record)
    }
}
