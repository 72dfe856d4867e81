use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::dtos::DailyActivityDto;
use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::progress::{ProgressAggregator, ProgressRepository};
use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{DailyThreshold, StreakCalculator, StreakStore, ThresholdSchedule};

/// Longest range a single activity query may cover.
const MAX_RANGE_DAYS: i64 = 366;

/// Read-only per-day view of a user's reading.
pub struct ActivityQueries {
    progress_repo: Arc<dyn ProgressRepository>,
    streak_store: Arc<dyn StreakStore>,
    boundary: DayBoundary,
    default_threshold: DailyThreshold,
}

impl ActivityQueries {
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

    /// One row per local date in `from..=to`, including days without
    /// reading, each judged against the threshold in effect that day.
    pub async fn daily_activity(
        &self,
        user_key: &UserKey,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyActivityDto>, DomainError> {
        if from > to {
            return Err(DomainError::Validation(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }
        let span = (to - from).num_days() + 1;
        if span > MAX_RANGE_DAYS {
            return Err(DomainError::Validation(format!(
                "Date range spans {} days, at most {} allowed",
                span, MAX_RANGE_DAYS
            )));
        }

        let (start, _) = self.boundary.day_range(from);
        let (_, end) = self.boundary.day_range(to);
        let entries = self
            .progress_repo
            .list_entries_between(user_key, start, end)
            .await?;

        let totals: HashMap<NaiveDate, u64> =
            ProgressAggregator::aggregate(&entries, &self.boundary)
                .into_iter()
                .map(|a| (a.date(), a.total_pages_read()))
                .collect();

        let current = self
            .streak_store
            .get(user_key)
            .await?
            .map(|r| r.daily_threshold())
            .unwrap_or(self.default_threshold);
        let schedule = ThresholdSchedule::new(
            self.streak_store.threshold_history(user_key).await?,
            current,
        );

        Ok(from
            .iter_days()
            .take_while(|date| *date <= to)
            .map(|date| {
                let total = totals.get(&date).copied().unwrap_or(0);
                let threshold = schedule.threshold_on(date);
                DailyActivityDto {
                    date: date.to_string(),
                    total_pages_read: total,
                    daily_threshold: threshold.value(),
                    is_qualifying: StreakCalculator::is_qualifying(total, threshold),
                }
            })
            .collect())
    }
}
