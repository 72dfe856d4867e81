pub mod progress_repo;
pub mod streak_repo;

pub use progress_repo::SqliteProgressRepository;
pub use streak_repo::SqliteStreakStore;
