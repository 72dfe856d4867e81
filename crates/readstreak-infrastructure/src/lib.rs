// Infrastructure layer - Technical implementations
// Depends on domain layer, implements its interfaces

pub mod config;
pub mod logging;
pub mod persistence;

pub use config::{EngineConfig, LogLevel, LoggingConfig};
pub use persistence::Database;
