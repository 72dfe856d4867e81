#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use readstreak_infrastructure::persistence::Database;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Fresh migrated in-memory database.
pub async fn setup_pool() -> Arc<SqlitePool> {
    let db = Database::in_memory().await.expect("in-memory database");
    db.run_migrations().await.expect("migrations");
    Arc::new(db.pool().clone())
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
