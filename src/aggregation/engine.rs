use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::config::{AggregationConfig, DurationPolicy};
use crate::errors::{DashboardError, DashboardResult};
use crate::models::{sanitize_secs, MachineStatus, StatusLogEntry};

/// Share of the aggregated time spent in each status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusProportions {
    pub off: f64,
    pub loaded: f64,
    pub on: f64,
    pub unknown: f64,
    pub total_secs: f64,
}

impl StatusProportions {
    pub fn fraction(&self, status: MachineStatus) -> f64 {
        match status {
            MachineStatus::Off => self.off,
            MachineStatus::Loaded => self.loaded,
            MachineStatus::On => self.on,
            MachineStatus::Unknown => self.unknown,
        }
    }

    pub fn sum(&self) -> f64 {
        self.off + self.loaded + self.on + self.unknown
    }
}

/// Outcome of [`aggregate`]: either proportions, or the sentinel for a range
/// with no logged time at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AggregateResult {
    NoData,
    Proportions(StatusProportions),
}

impl AggregateResult {
    pub fn is_no_data(&self) -> bool {
        matches!(self, AggregateResult::NoData)
    }

    pub fn proportions(&self) -> Option<&StatusProportions> {
        match self {
            AggregateResult::NoData => None,
            AggregateResult::Proportions(p) => Some(p),
        }
    }
}

#[derive(Debug, Default)]
struct StatusTotals {
    off: f64,
    loaded: f64,
    on: f64,
    unknown: f64,
}

impl StatusTotals {
    fn add(&mut self, status: MachineStatus, secs: f64) {
        let slot = match status {
            MachineStatus::Off => &mut self.off,
            MachineStatus::Loaded => &mut self.loaded,
            MachineStatus::On => &mut self.on,
            MachineStatus::Unknown => &mut self.unknown,
        };
        *slot += secs;
    }

    fn total(&self) -> f64 {
        self.off + self.loaded + self.on + self.unknown
    }
}

/// Time-in-state proportions using the default whole-entry policy.
pub fn aggregate(
    entries: &[StatusLogEntry],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> DashboardResult<AggregateResult> {
    aggregate_with(entries, range_start, range_end, &AggregationConfig::default())
}

/// Sums the logged seconds per status and divides by the total.
///
/// Entries are expected to be pre-filtered to the machine and range by the
/// log store; order does not matter. Under [`DurationPolicy::WholeEntry`] the
/// range only validates the caller contract.
pub fn aggregate_with(
    entries: &[StatusLogEntry],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    config: &AggregationConfig,
) -> DashboardResult<AggregateResult> {
    if range_start > range_end {
        return Err(DashboardError::InvalidRange {
            start: range_start,
            end: range_end,
        });
    }

    let mut totals = StatusTotals::default();
    for entry in entries {
        let secs = match config.duration_policy {
            DurationPolicy::WholeEntry => sanitize_secs(entry.duration_secs),
            DurationPolicy::ClipToRange => overlap_secs(entry, range_start, range_end),
        };
        totals.add(entry.status, secs);
    }

    let total = totals.total();
    if total == 0.0 {
        return Ok(AggregateResult::NoData);
    }

    Ok(AggregateResult::Proportions(StatusProportions {
        off: totals.off / total,
        loaded: totals.loaded / total,
        on: totals.on / total,
        unknown: totals.unknown / total,
        total_secs: total,
    }))
}

fn overlap_secs(entry: &StatusLogEntry, range_start: DateTime<Utc>, range_end: DateTime<Utc>) -> f64 {
    entry
        .overlap(range_start, range_end)
        .map_or(0.0, |(_, secs)| secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap()
    }

    fn entry(status: MachineStatus, offset_secs: i64, duration_secs: f64) -> StatusLogEntry {
        StatusLogEntry::new(status, t0() + Duration::seconds(offset_secs), duration_secs)
    }

    #[test]
    fn single_status_takes_everything() {
        let entries = vec![
            entry(MachineStatus::On, 0, 10.0),
            entry(MachineStatus::On, 10, 20.0),
            entry(MachineStatus::On, 30, 30.0),
        ];
        let result = aggregate(&entries, t0(), t0() + Duration::days(1)).unwrap();
        let p = result.proportions().expect("proportions");
        assert_eq!(p.on, 1.0);
        assert_eq!(p.off, 0.0);
        assert_eq!(p.loaded, 0.0);
        assert_eq!(p.total_secs, 60.0);
    }

    #[test]
    fn fractions_sum_to_one() {
        let entries = vec![
            entry(MachineStatus::Off, 0, 1234.5),
            entry(MachineStatus::Loaded, 1300, 77.25),
            entry(MachineStatus::On, 1400, 3.0),
            entry(MachineStatus::Loaded, 1500, 999.0),
        ];
        let result = aggregate(&entries, t0(), t0() + Duration::days(1)).unwrap();
        let p = result.proportions().expect("proportions");
        let defined: f64 = MachineStatus::DEFINED.iter().map(|s| p.fraction(*s)).sum();
        assert!((defined - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_zero_inputs_have_no_data() {
        assert!(aggregate(&[], t0(), t0()).unwrap().is_no_data());
        let zeros = vec![entry(MachineStatus::On, 0, 0.0), entry(MachineStatus::Off, 5, 0.0)];
        assert!(aggregate(&zeros, t0(), t0() + Duration::hours(1))
            .unwrap()
            .is_no_data());
    }

    #[test]
    fn unknown_statuses_keep_the_sum_whole() {
        let entries = vec![
            entry(MachineStatus::Unknown, 0, 25.0),
            entry(MachineStatus::Off, 25, 75.0),
        ];
        let result = aggregate(&entries, t0(), t0() + Duration::hours(1)).unwrap();
        let p = result.proportions().expect("proportions");
        assert_eq!(p.unknown, 0.25);
        assert_eq!(p.off, 0.75);
        assert!((p.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn whole_entry_policy_counts_time_outside_the_range() {
        let entries = vec![
            entry(MachineStatus::Off, -3600, 7200.0),
            entry(MachineStatus::On, 3600, 3600.0),
        ];
        let range_start = t0();
        let range_end = t0() + Duration::hours(2);

        let whole = aggregate(&entries, range_start, range_end).unwrap();
        assert_eq!(whole.proportions().unwrap().off, 2.0 / 3.0);

        let clipped =
            aggregate_with(&entries, range_start, range_end, &AggregationConfig::clipped()).unwrap();
        let p = clipped.proportions().unwrap();
        assert_eq!(p.off, 0.5);
        assert_eq!(p.on, 0.5);
        assert_eq!(p.total_secs, 7200.0);
    }

    #[test]
    fn clipping_everything_away_is_no_data() {
        let entries = vec![entry(MachineStatus::On, -7200, 3600.0)];
        let result = aggregate_with(
            &entries,
            t0(),
            t0() + Duration::hours(1),
            &AggregationConfig::clipped(),
        )
        .unwrap();
        assert!(result.is_no_data());
    }

    #[test]
    fn clipping_a_huge_duration_does_not_overflow() {
        let entries = vec![
            entry(MachineStatus::On, 0, 1.0e13),
            entry(MachineStatus::Off, -10, f64::MAX),
        ];
        let result = aggregate_with(
            &entries,
            t0(),
            t0() + Duration::hours(1),
            &AggregationConfig::clipped(),
        )
        .unwrap();
        let p = result.proportions().unwrap();
        assert_eq!(p.total_secs, 7200.0);
        assert_eq!(p.on, 0.5);
    }

    #[test]
    fn reversed_range_is_a_precondition_error() {
        let err = aggregate(&[], t0() + Duration::seconds(1), t0()).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidRange { .. }));
    }
}
