mod database;
pub mod memory;
mod repository_base;
pub mod repositories;

pub use database::Database;
pub use memory::{InMemoryProgressRepository, InMemoryStreakStore};
pub use repository_base::SqliteRepositoryBase;
