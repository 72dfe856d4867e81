// Application layer - streak services, queries and the CLI surface
// Depends on domain and infrastructure layers

pub mod application;
pub mod presentation;

pub use application::queries::ActivityQueries;
pub use application::services::{IncrementalUpdater, RebuildOrchestrator, StreakService};
