mod test_helpers;

use readstreak_domain::shared::{DomainError, UserKey};
use readstreak_domain::streak::{DailyThreshold, StreakRecord, StreakStats, StreakStore};
use readstreak_infrastructure::persistence::repositories::SqliteStreakStore;
use test_helpers::{date, setup_pool};

fn threshold(value: u32) -> DailyThreshold {
    DailyThreshold::new(value).unwrap()
}

#[tokio::test]
async fn test_get_missing_record_returns_none() {
    let store = SqliteStreakStore::new(setup_pool().await);
    assert!(store.get(&UserKey::single_tenant()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_or_create_persists_zeroed_record() {
    let store = SqliteStreakStore::new(setup_pool().await);
    let user = UserKey::from_string("reader");

    let created = store.get_or_create(&user, threshold(10)).await.unwrap();
    assert_eq!(created.current_streak(), 0);
    assert_eq!(created.daily_threshold().value(), 10);
    assert!(!created.streak_enabled());

    let loaded = store.get(&user).await.unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn test_upsert_overwrites_existing_record() {
    let store = SqliteStreakStore::new(setup_pool().await);
    let user = UserKey::single_tenant();
    let mut record = store
        .get_or_create(&user, DailyThreshold::DEFAULT)
        .await
        .unwrap();

    record.apply_stats(StreakStats {
        current_streak: 3,
        longest_streak: 5,
        last_activity_date: Some(date(2024, 2, 29)),
        streak_start_date: Some(date(2024, 2, 27)),
        total_days_active: 9,
    });
    record.set_streak_enabled(true);
    store.upsert(&record).await.unwrap();

    let loaded = store.get(&user).await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.last_activity_date(), Some(date(2024, 2, 29)));
}

#[tokio::test]
async fn test_update_threshold_without_record_is_not_found() {
    let store = SqliteStreakStore::new(setup_pool().await);
    let result = store
        .update_threshold(&UserKey::single_tenant(), threshold(5), date(2024, 1, 1))
        .await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_threshold_history_is_ordered_and_keeps_day_start_value() {
    let store = SqliteStreakStore::new(setup_pool().await);
    let user = UserKey::single_tenant();
    store
        .upsert(&StreakRecord::new(user.clone(), threshold(10)))
        .await
        .unwrap();

    store
        .update_threshold(&user, threshold(20), date(2024, 3, 5))
        .await
        .unwrap();
    store
        .update_threshold(&user, threshold(30), date(2024, 3, 5))
        .await
        .unwrap();
    let record = store
        .update_threshold(&user, threshold(15), date(2024, 3, 9))
        .await
        .unwrap();

    assert_eq!(record.daily_threshold().value(), 15);
    assert_eq!(
        store.get(&user).await.unwrap().unwrap().daily_threshold().value(),
        15
    );

    let history = store.threshold_history(&user).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].effective_from(), date(2024, 3, 5));
    assert_eq!(history[0].previous().value(), 10);
    assert_eq!(history[0].threshold().value(), 30);
    assert_eq!(history[1].effective_from(), date(2024, 3, 9));
    assert_eq!(history[1].previous().value(), 30);
    assert_eq!(history[1].threshold().value(), 15);
}

#[tokio::test]
async fn test_unchanged_threshold_adds_no_history() {
    let store = SqliteStreakStore::new(setup_pool().await);
    let user = UserKey::single_tenant();
    store
        .get_or_create(&user, threshold(10))
        .await
        .unwrap();

    store
        .update_threshold(&user, threshold(10), date(2024, 3, 5))
        .await
        .unwrap();

    assert!(store.threshold_history(&user).await.unwrap().is_empty());
}
