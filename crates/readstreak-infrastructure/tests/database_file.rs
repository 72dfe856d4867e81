mod test_helpers;

use readstreak_domain::shared::UserKey;
use readstreak_domain::streak::{DailyThreshold, StreakStore};
use readstreak_infrastructure::persistence::repositories::SqliteStreakStore;
use readstreak_infrastructure::{Database, EngineConfig, LogLevel};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_database_file_is_created_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("streaks.db");
    let db_path = db_path.to_str().unwrap();

    {
        let db = Database::new(db_path).await.unwrap();
        db.run_migrations().await.unwrap();
        let store = SqliteStreakStore::new(Arc::new(db.pool().clone()));
        store
            .get_or_create(&UserKey::single_tenant(), DailyThreshold::new(7).unwrap())
            .await
            .unwrap();
        db.pool().close().await;
    }

    let db = Database::new(db_path).await.unwrap();
    db.run_migrations().await.unwrap();
    let store = SqliteStreakStore::new(Arc::new(db.pool().clone()));
    let record = store.get(&UserKey::single_tenant()).await.unwrap().unwrap();
    assert_eq!(record.daily_threshold().value(), 7);
}

#[test]
fn test_config_load_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::load(&dir.path().join("absent.json"));
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_config_load_malformed_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(EngineConfig::load(&path), EngineConfig::default());
}

#[test]
fn test_config_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("readstreak").join("config.json");

    let mut config = EngineConfig::default();
    config.timezone = Some("Europe/Berlin".to_string());
    config.default_daily_threshold = 25;
    config.logging.level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.default_threshold().unwrap().value(), 25);
    assert_eq!(
        loaded.day_boundary().unwrap().timezone(),
        chrono_tz::Europe::Berlin
    );
}
