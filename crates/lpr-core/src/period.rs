//! The calendar window a report covers.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::CoreError;

/// An inclusive range of calendar dates.
///
/// A timestamp falls inside the period when it is at or after midnight UTC on
/// `start` and strictly before midnight UTC on the day after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPeriod`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive lower bound for timestamp filtering.
    #[must_use]
    pub fn start_utc(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Exclusive upper bound for timestamp filtering.
    #[must_use]
    pub fn end_exclusive_utc(&self) -> DateTime<Utc> {
        self.end
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_utc() && at < self.end_exclusive_utc()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_inverted_range() {
        let err = ReportPeriod::new(date(2025, 2, 1), date(2025, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPeriod { .. }));
    }

    #[test]
    fn single_day_period_is_valid() {
        let period = ReportPeriod::new(date(2025, 1, 1), date(2025, 1, 1)).unwrap();
        assert_eq!(period.start(), period.end());
    }

    #[test]
    fn end_date_is_inclusive_for_the_whole_day() {
        let period = ReportPeriod::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert!(period.contains(late));
        assert!(!period.contains(next));
    }

    #[test]
    fn start_midnight_is_included() {
        let period = ReportPeriod::new(date(2025, 1, 1), date(2025, 1, 31)).unwrap();
        let first = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert!(period.contains(first));
        assert!(!period.contains(before));
    }
}
