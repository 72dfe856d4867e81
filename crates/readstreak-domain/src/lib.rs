// Domain layer - Pure streak logic
// No dependencies on infrastructure or application layers

pub mod calendar;
pub mod progress;
pub mod shared;
pub mod streak;

// Re-exports for convenience
pub use calendar::DayBoundary;
pub use progress::{DailyAggregate, ProgressAggregator, ProgressEntry, ProgressRepository};
pub use shared::{Clock, DomainError, SystemClock, UserKey};
pub use streak::{
    DailyThreshold, StreakCalculator, StreakRecord, StreakStats, StreakStore, ThresholdChange,
    ThresholdPolicy, ThresholdSchedule,
};
