use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::application::queries::ActivityQueries;
use crate::application::services::StreakService;
use crate::presentation::state::AppState;
use readstreak_domain::progress::ProgressRepository;
use readstreak_domain::shared::SystemClock;
use readstreak_domain::streak::StreakStore;
use readstreak_infrastructure::persistence::repositories::{
    SqliteProgressRepository, SqliteStreakStore,
};
use readstreak_infrastructure::persistence::Database;
use readstreak_infrastructure::EngineConfig;

pub async fn build_app_state(config: &EngineConfig) -> anyhow::Result<AppState> {
    let boundary = config.day_boundary()?;
    let default_threshold = config.default_threshold()?;

    let db_path = config.database_path.to_string_lossy().into_owned();
    let db = Database::new(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path))?;
    db.run_migrations().await.context("Failed to run migrations")?;

    let pool = Arc::new(db.pool().clone());
    let progress_repo: Arc<dyn ProgressRepository> =
        Arc::new(SqliteProgressRepository::new(pool.clone()));
    let streak_store: Arc<dyn StreakStore> = Arc::new(SqliteStreakStore::new(pool));

    let streaks = Arc::new(StreakService::new(
        progress_repo.clone(),
        streak_store.clone(),
        Arc::new(SystemClock),
        boundary,
        default_threshold,
    ));
    let activity = Arc::new(ActivityQueries::new(
        progress_repo,
        streak_store,
        boundary,
        default_threshold,
    ));

    info!(
        timezone = %boundary.timezone(),
        default_threshold = %default_threshold,
        "Streak engine ready"
    );

    Ok(AppState {
        db: Arc::new(db),
        streaks,
        activity,
    })
}
