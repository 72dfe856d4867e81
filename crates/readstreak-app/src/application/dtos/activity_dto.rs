use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivityDto {
    pub date: String, // YYYY-MM-DD
    pub total_pages_read: u64,
    pub daily_threshold: u32,
    pub is_qualifying: bool,
}
