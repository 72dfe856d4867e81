mod activity_dto;
mod streak_dto;

pub use activity_dto::DailyActivityDto;
pub use streak_dto::StreakDto;
