use std::sync::Arc;

use crate::application::queries::ActivityQueries;
use crate::application::services::StreakService;
use readstreak_infrastructure::persistence::Database;
use readstreak_infrastructure::EngineConfig;

pub struct AppState {
    pub db: Arc<Database>,
    pub streaks: Arc<StreakService>,
    pub activity: Arc<ActivityQueries>,
}

impl AppState {
    pub async fn new(config: &EngineConfig) -> anyhow::Result<Self> {
        crate::presentation::bootstrap::build_app_state(config).await
    }
}
