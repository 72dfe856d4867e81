mod aggregator;
mod entry;
mod repository;


pub use aggregator::{DailyAggregate, ProgressAggregator};
pub use entry::ProgressEntry;
pub use repository::ProgressRepository;
