use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, DashboardResult};
use crate::models::{seconds_to_duration, MachineStatus, StatusLogEntry};

/// A status interval clipped to lie entirely inside the display window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSegment {
    pub status: MachineStatus,
    pub start_time: DateTime<Utc>,
    pub duration_secs: f64,
}

impl TimelineSegment {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time
            .checked_add_signed(seconds_to_duration(self.duration_secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl From<TimelineSegment> for StatusLogEntry {
    fn from(segment: TimelineSegment) -> Self {
        StatusLogEntry::new(segment.status, segment.start_time, segment.duration_secs)
    }
}

/// Clips each entry to `[window_start, window_end]`.
///
/// Entries must already be ordered by start time; the output keeps that
/// order. Entries straddling a bound are truncated (never split), entries with
/// no overlap are dropped, and neighbouring entries of the same status are not
/// merged.
pub fn segment(
    entries: &[StatusLogEntry],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> DashboardResult<Vec<TimelineSegment>> {
    if window_start >= window_end {
        return Err(DashboardError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }

    let segments = entries
        .iter()
        .filter_map(|entry| clip_entry(entry, window_start, window_end))
        .collect();

    Ok(segments)
}

fn clip_entry(
    entry: &StatusLogEntry,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Option<TimelineSegment> {
    let (start_time, duration_secs) = entry.overlap(window_start, window_end)?;
    Some(TimelineSegment {
        status: entry.status,
        start_time,
        duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn at(offset_secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(offset_secs)
    }

    fn entry(status: MachineStatus, offset_secs: i64, duration_secs: f64) -> StatusLogEntry {
        StatusLogEntry::new(status, at(offset_secs), duration_secs)
    }

    #[test]
    fn entries_inside_the_window_pass_through() {
        let entries = vec![
            entry(MachineStatus::On, 0, 3600.0),
            entry(MachineStatus::Off, 3600, 1800.0),
        ];
        let segments = segment(&entries, t0(), at(5400)).unwrap();
        assert_eq!(
            segments,
            vec![
                TimelineSegment {
                    status: MachineStatus::On,
                    start_time: t0(),
                    duration_secs: 3600.0,
                },
                TimelineSegment {
                    status: MachineStatus::Off,
                    start_time: at(3600),
                    duration_secs: 1800.0,
                },
            ]
        );
    }

    #[test]
    fn front_of_straddling_entry_is_truncated() {
        let entries = vec![entry(MachineStatus::Loaded, -1800, 3600.0)];
        let segments = segment(&entries, t0(), at(86_400)).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].status, MachineStatus::Loaded);
        assert_eq!(segments[0].start_time, t0());
        assert_eq!(segments[0].duration_secs, 1800.0);
    }

    #[test]
    fn back_of_straddling_entry_is_truncated() {
        let entries = vec![entry(MachineStatus::On, 3000, 1200.0)];
        let segments = segment(&entries, t0(), at(3600)).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_time, at(3000));
        assert_eq!(segments[0].duration_secs, 600.0);
    }

    #[test]
    fn entry_covering_the_whole_window_becomes_the_window() {
        let entries = vec![entry(MachineStatus::Off, -100, 10_000.0)];
        let segments = segment(&entries, t0(), at(60)).unwrap();
        assert_eq!(segments[0].start_time, t0());
        assert_eq!(segments[0].duration_secs, 60.0);
    }

    #[test]
    fn entries_outside_or_degenerate_are_dropped() {
        let entries = vec![
            entry(MachineStatus::Off, -7200, 3600.0),
            entry(MachineStatus::Off, -3600, 3600.0),
            entry(MachineStatus::On, 100, 0.0),
            entry(MachineStatus::On, 200, -50.0),
            entry(MachineStatus::Loaded, 3600, 60.0),
            entry(MachineStatus::Loaded, 9000, 60.0),
        ];
        let segments = segment(&entries, t0(), at(3600)).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn same_status_neighbours_are_not_merged() {
        let entries = vec![
            entry(MachineStatus::On, 0, 60.0),
            entry(MachineStatus::On, 60, 60.0),
        ];
        let segments = segment(&entries, t0(), at(3600)).unwrap();
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn output_keeps_input_order() {
        let entries = vec![
            entry(MachineStatus::Loaded, -10, 20.0),
            entry(MachineStatus::Off, 10, 5.0),
            entry(MachineStatus::On, 15, 100.0),
        ];
        let statuses: Vec<_> = segment(&entries, t0(), at(50))
            .unwrap()
            .into_iter()
            .map(|s| s.status)
            .collect();
        assert_eq!(
            statuses,
            vec![MachineStatus::Loaded, MachineStatus::Off, MachineStatus::On]
        );
    }

    #[test]
    fn segments_stay_inside_the_window() {
        let window_start = t0() + Duration::milliseconds(250);
        let window_end = at(7200) + Duration::microseconds(17);
        let entries: Vec<_> = (0..40)
            .map(|i| {
                let status = MachineStatus::DEFINED[i % 3];
                entry(status, -3600 + (i as i64) * 317, 411.3 + i as f64)
            })
            .collect();
        for seg in segment(&entries, window_start, window_end).unwrap() {
            assert!(seg.start_time >= window_start);
            assert!(seg.end_time() <= window_end);
            assert!(seg.duration_secs > 0.0);
        }
    }

    #[test]
    fn segmenting_twice_changes_nothing() {
        let window_start = t0() + Duration::nanoseconds(123_456_789);
        let window_end = at(5000);
        let entries = vec![
            entry(MachineStatus::Off, -500, 1000.25),
            entry(MachineStatus::On, 600, 2000.0),
            entry(MachineStatus::Loaded, 4000, 3333.3),
        ];
        let first = segment(&entries, window_start, window_end).unwrap();
        let again: Vec<StatusLogEntry> = first.iter().cloned().map(Into::into).collect();
        let second = segment(&again, window_start, window_end).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn untouched_entries_keep_their_exact_duration() {
        let entries = vec![
            entry(MachineStatus::On, 10, 0.1234567),
            entry(MachineStatus::Loaded, 20, 4e-7),
            entry(MachineStatus::Off, 30, 1e-12),
        ];
        let durations: Vec<_> = segment(&entries, t0(), at(3600))
            .unwrap()
            .into_iter()
            .map(|s| s.duration_secs)
            .collect();
        assert_eq!(durations, vec![0.1234567, 4e-7, 1e-12]);
    }

    #[test]
    fn huge_durations_are_clipped_to_the_window() {
        for duration_secs in [1.0e13, f64::MAX] {
            let entries = vec![entry(MachineStatus::On, 0, duration_secs)];
            let segments = segment(&entries, t0(), at(86_400)).unwrap();
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].start_time, t0());
            assert_eq!(segments[0].duration_secs, 86_400.0);
        }
    }

    #[test]
    fn empty_window_is_a_precondition_error() {
        assert!(matches!(
            segment(&[], t0(), t0()),
            Err(DashboardError::InvalidWindow { .. })
        ));
    }
}
