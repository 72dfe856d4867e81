use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdError {
    #[error("Daily threshold must be an integer")]
    NotInteger,

    #[error("Daily threshold must be between 1 and 9999")]
    OutOfRange,
}

impl From<ThresholdError> for DomainError {
    fn from(err: ThresholdError) -> Self {
        DomainError::Validation(err.to_string())
    }
}

/// Minimum pages per day for a day to count towards a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct DailyThreshold(u32);

impl DailyThreshold {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 9999;
    pub const DEFAULT: DailyThreshold = DailyThreshold(1);

    pub fn new(value: u32) -> Result<Self, ThresholdError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ThresholdError::OutOfRange)
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Meeting the threshold exactly counts.
    pub fn is_met_by(&self, pages: u64) -> bool {
        pages >= u64::from(self.0)
    }
}

impl Default for DailyThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for DailyThreshold {
    type Error = ThresholdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        ThresholdPolicy::validate_integer(value)
    }
}

impl From<DailyThreshold> for u32 {
    fn from(threshold: DailyThreshold) -> Self {
        threshold.0
    }
}

impl std::fmt::Display for DailyThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation for user-supplied thresholds. All-or-nothing.
pub struct ThresholdPolicy;

impl ThresholdPolicy {
    /// Validate a numeric value as received from a caller (any JSON number).
    pub fn validate(value: f64) -> Result<DailyThreshold, ThresholdError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(ThresholdError::NotInteger);
        }
        if value < f64::from(DailyThreshold::MIN) || value > f64::from(DailyThreshold::MAX) {
            return Err(ThresholdError::OutOfRange);
        }
        Ok(DailyThreshold(value as u32))
    }

    pub fn validate_integer(value: i64) -> Result<DailyThreshold, ThresholdError> {
        u32::try_from(value)
            .map_err(|_| ThresholdError::OutOfRange)
            .and_then(DailyThreshold::new)
    }

    /// Validate textual input, e.g. a CLI argument or a form field.
    pub fn parse(input: &str) -> Result<DailyThreshold, ThresholdError> {
        let value: f64 = input
            .trim()
            .parse()
            .map_err(|_| ThresholdError::NotInteger)?;
        Self::validate(value)
    }
}

/// A threshold change, effective from a local date onwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdChange {
    effective_from: NaiveDate,
    previous: DailyThreshold,
    threshold: DailyThreshold,
}

impl ThresholdChange {
    pub fn new(
        effective_from: NaiveDate,
        previous: DailyThreshold,
        threshold: DailyThreshold,
    ) -> Self {
        Self {
            effective_from,
            previous,
            threshold,
        }
    }

    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    pub fn previous(&self) -> DailyThreshold {
        self.previous
    }

    pub fn threshold(&self) -> DailyThreshold {
        self.threshold
    }
}

/// Threshold in effect on each local date.
///
/// Days before the first change use that change's previous value; days on or
/// after the last change use the current threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSchedule {
    changes: Vec<ThresholdChange>,
    current: DailyThreshold,
}

impl ThresholdSchedule {
    pub fn constant(threshold: DailyThreshold) -> Self {
        Self {
            changes: Vec::new(),
            current: threshold,
        }
    }

    pub fn new(mut changes: Vec<ThresholdChange>, current: DailyThreshold) -> Self {
        changes.sort_by_key(|change| change.effective_from);
        changes.dedup_by_key(|change| change.effective_from);
        Self { changes, current }
    }

    pub fn current(&self) -> DailyThreshold {
        self.current
    }

    pub fn changes(&self) -> &[ThresholdChange] {
        &self.changes
    }

    pub fn threshold_on(&self, date: NaiveDate) -> DailyThreshold {
        let applied = self
            .changes
            .partition_point(|change| change.effective_from <= date);

        match applied {
            0 => self
                .changes
                .first()
                .map(|change| change.previous)
                .unwrap_or(self.current),
            n if n == self.changes.len() => self.current,
            n => self.changes[n - 1].threshold,
        }
    }
}
