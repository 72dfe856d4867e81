//! Local calendar days.
//!
//! Every date the engine reasons about is a *local* date in the user's
//! current timezone. Historical entries recorded under another offset are
//! re-bucketed under the current zone, so the zone is injected here instead
//! of being read from the host at conversion time.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::shared::DomainError;

/// Largest daylight-saving jump searched when local midnight does not exist.
const MAX_MIDNIGHT_GAP_MINUTES: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    timezone: Tz,
}

impl DayBoundary {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    /// Build from an IANA name such as `Europe/Berlin`.
    pub fn from_name(name: &str) -> Result<Self, DomainError> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|e| DomainError::Validation(format!("Unknown timezone '{}': {}", name, e)))
    }

    /// Host timezone, or UTC when it cannot be determined.
    pub fn system() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => Self::from_name(&name).unwrap_or_else(|e| {
                warn!(timezone = %name, error = %e, "host timezone not recognised, using UTC");
                Self::utc()
            }),
            Err(e) => {
                warn!(error = %e, "could not determine host timezone, using UTC");
                Self::utc()
            }
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn to_local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.timezone).date_naive()
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.to_local_date(now)
    }

    /// First instant of `date` in this timezone.
    ///
    /// When a daylight-saving transition skips local midnight the day starts
    /// at the first local time that exists; an ambiguous midnight resolves to
    /// the earlier instant.
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);

        for minutes in (0..=MAX_MIDNIGHT_GAP_MINUTES).step_by(15) {
            let local = midnight + Duration::minutes(minutes);
            if let Some(instant) = self.timezone.from_local_datetime(&local).earliest() {
                return instant.with_timezone(&Utc);
            }
        }

        Utc.from_utc_datetime(&midnight)
    }

    /// Half-open UTC interval `[start, end)` covering the local `date`.
    pub fn day_range(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.start_of_day(date);
        let end = match date.succ_opt() {
            Some(next) => self.start_of_day(next),
            None => DateTime::<Utc>::MAX_UTC,
        };
        (start, end)
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}
