use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use super::{IncrementalUpdater, RebuildOrchestrator, UserLocks};
use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::progress::{ProgressEntry, ProgressRepository};
use readstreak_domain::shared::{Clock, DomainError, UserKey};
use readstreak_domain::streak::{DailyThreshold, StreakRecord, StreakStore, ThresholdPolicy};

/// Entry point for everything that reads or changes a streak record.
///
/// Every operation runs under the caller's per-user lock, so a rebuild and an
/// incremental update for the same key never interleave.
pub struct StreakService {
    progress_repo: Arc<dyn ProgressRepository>,
    streak_store: Arc<dyn StreakStore>,
    rebuild: Arc<RebuildOrchestrator>,
    updater: IncrementalUpdater,
    clock: Arc<dyn Clock>,
    boundary: DayBoundary,
    default_threshold: DailyThreshold,
    locks: UserLocks,
}

impl StreakService {
    pub fn new(
        progress_repo: Arc<dyn ProgressRepository>,
        streak_store: Arc<dyn StreakStore>,
        clock: Arc<dyn Clock>,
        boundary: DayBoundary,
        default_threshold: DailyThreshold,
    ) -> Self {
        let rebuild = Arc::new(RebuildOrchestrator::new(
            progress_repo.clone(),
            streak_store.clone(),
            boundary,
            default_threshold,
        ));
        let updater = IncrementalUpdater::new(
            progress_repo.clone(),
            streak_store.clone(),
            boundary,
            rebuild.clone(),
        );

        Self {
            progress_repo,
            streak_store,
            rebuild,
            updater,
            clock,
            boundary,
            default_threshold,
            locks: UserLocks::new(),
        }
    }

    /// Local date of the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.boundary.today(self.clock.now())
    }

    /// Stored record, created zeroed on first access.
    pub async fn get_streak(&self, user_key: &UserKey) -> Result<StreakRecord, DomainError> {
        let _guard = self.locks.acquire(user_key).await;
        self.streak_store
            .get_or_create(user_key, self.default_threshold)
            .await
    }

    pub async fn rebuild_streak(
        &self,
        user_key: &UserKey,
        as_of: Option<NaiveDate>,
        enable_tracking: bool,
    ) -> Result<StreakRecord, DomainError> {
        let as_of = as_of.unwrap_or_else(|| self.today());
        let _guard = self.locks.acquire(user_key).await;
        self.rebuild.rebuild(user_key, as_of, enable_tracking).await
    }

    /// Fold today's reading into the record.
    pub async fn update_streaks(&self, user_key: &UserKey) -> Result<StreakRecord, DomainError> {
        let today = self.today();
        let _guard = self.locks.acquire(user_key).await;
        self.updater.update(user_key, today).await
    }

    /// Change the daily goal from today onwards. Invalid values are rejected
    /// before anything is read or written.
    ///
    /// A record that has never been evaluated takes the new goal for its
    /// whole history; otherwise the change is logged effective today.
    pub async fn set_threshold(
        &self,
        user_key: &UserKey,
        value: f64,
    ) -> Result<StreakRecord, DomainError> {
        let threshold = ThresholdPolicy::validate(value)?;
        let today = self.today();

        let _guard = self.locks.acquire(user_key).await;
        let mut record = self
            .streak_store
            .get_or_create(user_key, self.default_threshold)
            .await?;

        if record.is_unevaluated() {
            if record.daily_threshold() != threshold {
                record.set_daily_threshold(threshold);
                self.streak_store.upsert(&record).await?;
            }
        } else {
            record = self
                .streak_store
                .update_threshold(user_key, threshold, today)
                .await?;
        }

        info!("Daily threshold for {} set to {} from {}", user_key, threshold, today);
        Ok(record)
    }

    /// Turn tracking on or off. `initial_threshold` is applied only when
    /// enabling, and is validated before any change is made.
    pub async fn set_streak_enabled(
        &self,
        user_key: &UserKey,
        enabled: bool,
        initial_threshold: Option<f64>,
    ) -> Result<StreakRecord, DomainError> {
        let threshold = initial_threshold
            .filter(|_| enabled)
            .map(ThresholdPolicy::validate)
            .transpose()?;
        let today = self.today();

        let _guard = self.locks.acquire(user_key).await;
        let mut record = self
            .streak_store
            .get_or_create(user_key, self.default_threshold)
            .await?;
        let mut changed = false;

        if let Some(threshold) = threshold {
            if record.is_unevaluated() {
                // Onboarding: the chosen goal applies to the backfilled history too
                changed = record.daily_threshold() != threshold;
                record.set_daily_threshold(threshold);
            } else {
                record = self
                    .streak_store
                    .update_threshold(user_key, threshold, today)
                    .await?;
            }
        }

        if record.streak_enabled() != enabled {
            record.set_streak_enabled(enabled);
            changed = true;
            info!("Streak tracking for {} set to {}", user_key, enabled);
        }

        if changed {
            self.streak_store.upsert(&record).await?;
        }

        Ok(record)
    }

    /// Store a progress entry and bring the streak up to date with it.
    ///
    /// Entries for today take the incremental path; entries for an earlier
    /// day change history and trigger a rebuild.
    pub async fn record_progress(
        &self,
        user_key: &UserKey,
        entry: ProgressEntry,
    ) -> Result<StreakRecord, DomainError> {
        let today = self.today();
        let entry_date = self.boundary.to_local_date(entry.progress_timestamp());

        let _guard = self.locks.acquire(user_key).await;
        self.progress_repo.save(user_key, &entry).await?;

        if entry_date < today {
            info!(
                "Back-dated progress for {} on {}, rebuilding as of {}",
                user_key, entry_date, today
            );
            self.rebuild.rebuild(user_key, today, false).await
        } else {
            self.updater.update(user_key, today).await
        }
    }
}
