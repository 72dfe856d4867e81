mod incremental_updater;
mod rebuild_orchestrator;
mod streak_service;
mod user_locks;


pub use incremental_updater::IncrementalUpdater;
pub use rebuild_orchestrator::RebuildOrchestrator;
pub use streak_service::StreakService;
pub use user_locks::{UserLockGuard, UserLocks};
