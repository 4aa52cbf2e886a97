use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, DashboardResult};

/// Inclusive UTC bounds used by the time-in-state aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DashboardResult<Self> {
        if start > end {
            return Err(DashboardError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Expands calendar days to `[first 00:00:00, last 23:59:59]`.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> DashboardResult<Self> {
        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = last.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
            - Duration::seconds(1);
        Self::new(start, end)
    }

    /// The `days` calendar days ending with (and including) the day of `now`.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> DashboardResult<Self> {
        let today = now.date_naive();
        let first = today - Duration::days(i64::from(days.max(1)) - 1);
        Self::from_days(first, today)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Half-open display window `[start, end)` for the timeline row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DashboardResult<Self> {
        if start >= end {
            return Err(DashboardError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn trailing(now: DateTime<Utc>, hours: u32) -> DashboardResult<Self> {
        Self::new(now - Duration::hours(i64::from(hours)), now)
    }

    /// Same bounds as a range, for queries shared with the aggregation.
    pub fn as_range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn from_days_covers_whole_days() {
        let first = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        let range = DateRange::from_days(first, last).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 10, 7, 23, 59, 59).unwrap());
    }

    #[test]
    fn reversed_range_is_rejected() {
        let first = NaiveDate::from_ymd_opt(2026, 10, 8).unwrap();
        let last = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        assert!(matches!(
            DateRange::from_days(first, last),
            Err(DashboardError::InvalidRange { .. })
        ));
    }

    #[test]
    fn last_days_includes_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 13, 30, 0).unwrap();
        let range = DateRange::last_days(now, 7).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2026, 10, 9, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2026, 10, 15, 23, 59, 59).unwrap());
    }

    #[test]
    fn empty_window_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 13, 30, 0).unwrap();
        assert!(TimelineWindow::trailing(now, 0).is_err());
        let window = TimelineWindow::trailing(now, 24).unwrap();
        assert_eq!(window.end - window.start, Duration::hours(24));
    }
}
