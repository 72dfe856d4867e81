mod calculator;
mod record;
mod repository;
mod threshold;

#[cfg(test)]
mod threshold_test;

pub use calculator::StreakCalculator;
pub use record::{StreakRecord, StreakStats};
pub use repository::StreakStore;
pub use threshold::{
    DailyThreshold, ThresholdChange, ThresholdError, ThresholdPolicy, ThresholdSchedule,
};
