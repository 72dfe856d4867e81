use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ProgressEntry;
use crate::calendar::DayBoundary;

/// Pages read on one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    date: NaiveDate,
    total_pages_read: u64,
}

impl DailyAggregate {
    pub fn new(date: NaiveDate, total_pages_read: u64) -> Self {
        Self {
            date,
            total_pages_read,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total_pages_read(&self) -> u64 {
        self.total_pages_read
    }
}

pub struct ProgressAggregator;

impl ProgressAggregator {
    /// Group entries by local date and sum their pages.
    ///
    /// Output is strictly ascending by date. Days without entries are absent
    /// rather than present with a zero total.
    pub fn aggregate(entries: &[ProgressEntry], boundary: &DayBoundary) -> Vec<DailyAggregate> {
        let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();

        for entry in entries {
            let date = boundary.to_local_date(entry.progress_timestamp());
            let total = totals.entry(date).or_insert(0);
            *total = total.saturating_add(u64::from(entry.pages_read()));
        }

        totals
            .into_iter()
            .map(|(date, total)| DailyAggregate::new(date, total))
            .collect()
    }

    /// Total pages for a single local date, ignoring entries on other days.
    pub fn total_for_date(
        entries: &[ProgressEntry],
        date: NaiveDate,
        boundary: &DayBoundary,
    ) -> u64 {
        entries
            .iter()
            .filter(|entry| boundary.to_local_date(entry.progress_timestamp()) == date)
            .fold(0u64, |acc, entry| {
                acc.saturating_add(u64::from(entry.pages_read()))
            })
    }
}
