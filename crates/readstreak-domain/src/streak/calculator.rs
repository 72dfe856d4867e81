use chrono::NaiveDate;

use super::{DailyThreshold, StreakStats, ThresholdSchedule};
use crate::progress::DailyAggregate;
use crate::shared::DomainError;

/// Streak rules shared by the full rebuild and the incremental update.
///
/// A day qualifies when its total meets the threshold in effect that day. A
/// run is a maximal sequence of qualifying days on consecutive dates; a day
/// with no aggregate breaks a run exactly like a non-qualifying one. The run
/// ending at the last qualifying day stays current while that day is today
/// or yesterday.
pub struct StreakCalculator;

impl StreakCalculator {
    pub fn is_qualifying(total_pages_read: u64, threshold: DailyThreshold) -> bool {
        threshold.is_met_by(total_pages_read)
    }

    /// Full computation over a strictly ascending, possibly sparse, list of
    /// daily aggregates. Days after `as_of` are ignored.
    pub fn calculate(
        aggregates: &[DailyAggregate],
        thresholds: &ThresholdSchedule,
        as_of: NaiveDate,
    ) -> Result<StreakStats, DomainError> {
        Self::ensure_strictly_ascending(aggregates)?;

        let qualifying = aggregates
            .iter()
            .take_while(|aggregate| aggregate.date() <= as_of)
            .filter(|aggregate| {
                Self::is_qualifying(
                    aggregate.total_pages_read(),
                    thresholds.threshold_on(aggregate.date()),
                )
            })
            .map(DailyAggregate::date);

        let mut longest_streak = 0u32;
        let mut total_days_active = 0u32;
        // (first day, last day, length) of the run being walked
        let mut run: Option<(NaiveDate, NaiveDate, u32)> = None;

        for date in qualifying {
            total_days_active = total_days_active.saturating_add(1);

            let extended = match run {
                Some((start, end, len)) if days_between(end, date) == 1 => {
                    (start, date, len.saturating_add(1))
                }
                _ => (date, date, 1),
            };
            longest_streak = longest_streak.max(extended.2);
            run = Some(extended);
        }

        let Some((run_start, last_qualifying, run_len)) = run else {
            return Ok(StreakStats::default());
        };

        let (current_streak, streak_start_date) = if days_between(last_qualifying, as_of) > 1 {
            (0, None)
        } else {
            (run_len, Some(run_start))
        };

        Ok(StreakStats {
            current_streak,
            longest_streak,
            last_activity_date: Some(last_qualifying),
            streak_start_date,
            total_days_active,
        })
    }

    pub fn calculate_with_threshold(
        aggregates: &[DailyAggregate],
        threshold: DailyThreshold,
        as_of: NaiveDate,
    ) -> Result<StreakStats, DomainError> {
        Self::calculate(aggregates, &ThresholdSchedule::constant(threshold), as_of)
    }

    /// Fold one more day into previously computed stats.
    ///
    /// `today_total` is the complete page total for `today`. Returns `None`
    /// when `today` precedes the last activity date; such input needs a full
    /// rebuild.
    pub fn advance(
        previous: &StreakStats,
        today: NaiveDate,
        today_total: u64,
        threshold: DailyThreshold,
    ) -> Option<StreakStats> {
        let gap = match previous.last_activity_date {
            Some(last) if today < last => return None,
            Some(last) if today == last => return Some(*previous),
            Some(last) => Some(days_between(last, today)),
            None => None,
        };

        let mut next = *previous;

        if !Self::is_qualifying(today_total, threshold) {
            if matches!(gap, Some(days) if days > 1) {
                next.current_streak = 0;
                next.streak_start_date = None;
            }
            return Some(next);
        }

        match gap {
            Some(1) if previous.current_streak > 0 => {
                next.current_streak = previous.current_streak.saturating_add(1);
                next.streak_start_date = previous.streak_start_date.or(Some(today));
            }
            _ => {
                next.current_streak = 1;
                next.streak_start_date = Some(today);
            }
        }

        next.last_activity_date = Some(today);
        next.total_days_active = previous.total_days_active.saturating_add(1);
        next.longest_streak = previous.longest_streak.max(next.current_streak);

        Some(next)
    }

    fn ensure_strictly_ascending(aggregates: &[DailyAggregate]) -> Result<(), DomainError> {
        for pair in aggregates.windows(2) {
            let (prev, next) = (pair[0].date(), pair[1].date());
            if next == prev {
                return Err(DomainError::DataIntegrity(format!(
                    "Duplicate daily aggregate for {}",
                    next
                )));
            }
            if next < prev {
                return Err(DomainError::DataIntegrity(format!(
                    "Daily aggregates out of order: {} after {}",
                    next, prev
                )));
            }
        }
        Ok(())
    }
}

fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
