#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use readstreak_domain::calendar::DayBoundary;
use readstreak_domain::progress::{ProgressEntry, ProgressRepository};
use readstreak_domain::shared::{BookId, ManualClock, UserKey};
use readstreak_domain::streak::DailyThreshold;
use readstreak_infrastructure::persistence::{InMemoryProgressRepository, InMemoryStreakStore};
use readstreak_lib::StreakService;

/// Service wired to in-memory stores and a manual clock, in UTC.
pub struct Harness {
    pub service: Arc<StreakService>,
    pub progress: Arc<InMemoryProgressRepository>,
    pub store: Arc<InMemoryStreakStore>,
    pub clock: Arc<ManualClock>,
    pub user: UserKey,
}

impl Harness {
    pub fn new(threshold: u32) -> Self {
        Self::with_boundary(threshold, DayBoundary::utc())
    }

    pub fn with_boundary(threshold: u32, boundary: DayBoundary) -> Self {
        let progress = Arc::new(InMemoryProgressRepository::new());
        let store = Arc::new(InMemoryStreakStore::new());
        let clock = Arc::new(ManualClock::new(noon(day(0))));
        let service = Arc::new(StreakService::new(
            progress.clone(),
            store.clone(),
            clock.clone(),
            boundary,
            DailyThreshold::new(threshold).unwrap(),
        ));

        Self {
            service,
            progress,
            store,
            clock,
            user: UserKey::single_tenant(),
        }
    }

    pub fn set_today(&self, date: NaiveDate) {
        self.clock.set(noon(date));
    }

    /// Store an entry without touching the streak.
    pub async fn add_entry(&self, at: DateTime<Utc>, pages: u32) {
        self.progress
            .save(&self.user, &ProgressEntry::new(BookId::new(), None, pages, at))
            .await
            .unwrap();
    }

    /// Store one entry per day starting at `start`.
    pub async fn add_days(&self, start: NaiveDate, pages: &[u32]) {
        for (offset, count) in pages.iter().enumerate() {
            self.add_entry(noon(start + Duration::days(offset as i64)), *count)
                .await;
        }
    }
}

/// Day `n` of a fixed test calendar starting 2024-01-01.
pub fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
}

pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}
