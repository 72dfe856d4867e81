use serde::{Deserialize, Serialize};

use readstreak_domain::streak::StreakRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDto {
    pub user_key: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity_date: Option<String>, // YYYY-MM-DD
    pub streak_start_date: Option<String>,  // YYYY-MM-DD
    pub total_days_active: u32,
    pub daily_threshold: u32,
    pub streak_enabled: bool,
}

impl From<&StreakRecord> for StreakDto {
    fn from(record: &StreakRecord) -> Self {
        Self {
            user_key: record.user_key().to_string(),
            current_streak: record.current_streak(),
            longest_streak: record.longest_streak(),
            last_activity_date: record.last_activity_date().map(|d| d.to_string()),
            streak_start_date: record.streak_start_date().map(|d| d.to_string()),
            total_days_active: record.total_days_active(),
            daily_threshold: record.daily_threshold().value(),
            streak_enabled: record.streak_enabled(),
        }
    }
}
