use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DailyThreshold;
use crate::shared::{DomainError, UserKey};

/// Derived streak numbers, as produced by [`super::StreakCalculator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Last qualifying day, kept even after the streak goes stale.
    pub last_activity_date: Option<NaiveDate>,
    /// First day of the current run; `None` while the current streak is zero.
    pub streak_start_date: Option<NaiveDate>,
    pub total_days_active: u32,
}

/// Persisted streak summary, one per user key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    user_key: UserKey,
    stats: StreakStats,
    daily_threshold: DailyThreshold,
    streak_enabled: bool,
}

impl StreakRecord {
    /// Zeroed record, as created on first access.
    pub fn new(user_key: UserKey, daily_threshold: DailyThreshold) -> Self {
        Self {
            user_key,
            stats: StreakStats::default(),
            daily_threshold,
            streak_enabled: false,
        }
    }

    pub fn restore(
        user_key: UserKey,
        stats: StreakStats,
        daily_threshold: DailyThreshold,
        streak_enabled: bool,
    ) -> Result<Self, DomainError> {
        if stats.current_streak > stats.longest_streak {
            return Err(DomainError::DataIntegrity(format!(
                "Streak record for {} has current streak {} above longest streak {}",
                user_key, stats.current_streak, stats.longest_streak
            )));
        }

        Ok(Self {
            user_key,
            stats,
            daily_threshold,
            streak_enabled,
        })
    }

    pub fn user_key(&self) -> &UserKey {
        &self.user_key
    }

    pub fn stats(&self) -> StreakStats {
        self.stats
    }

    pub fn current_streak(&self) -> u32 {
        self.stats.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.stats.longest_streak
    }

    pub fn last_activity_date(&self) -> Option<NaiveDate> {
        self.stats.last_activity_date
    }

    pub fn streak_start_date(&self) -> Option<NaiveDate> {
        self.stats.streak_start_date
    }

    pub fn total_days_active(&self) -> u32 {
        self.stats.total_days_active
    }

    pub fn daily_threshold(&self) -> DailyThreshold {
        self.daily_threshold
    }

    pub fn streak_enabled(&self) -> bool {
        self.streak_enabled
    }

    /// True until the record has been enabled or has seen a qualifying day,
    /// so no past day has been judged against its threshold yet.
    pub fn is_unevaluated(&self) -> bool {
        !self.streak_enabled && self.stats == StreakStats::default()
    }

    pub fn apply_stats(&mut self, stats: StreakStats) {
        self.stats = stats;
    }

    pub fn set_daily_threshold(&mut self, threshold: DailyThreshold) {
        self.daily_threshold = threshold;
    }

    pub fn set_streak_enabled(&mut self, enabled: bool) {
        self.streak_enabled = enabled;
    }
}
