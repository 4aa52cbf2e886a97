use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::MachineStatus;

/// Largest span, in seconds, that still fits in an `i64` count of nanoseconds.
const MAX_NANOSECOND_SECS: f64 = 9.2e9;

/// One observed machine-state interval as read from the log store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusLogEntry {
    pub status: MachineStatus,
    pub start_time: DateTime<Utc>,
    pub duration_secs: f64,
}

impl StatusLogEntry {
    pub fn new(status: MachineStatus, start_time: DateTime<Utc>, duration_secs: f64) -> Self {
        Self {
            status,
            start_time,
            duration_secs,
        }
    }

    /// Negative durations are treated as empty intervals. Ends past the last
    /// representable instant saturate to it.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.start_time
            .checked_add_signed(seconds_to_duration(self.duration_secs))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// The part of this entry inside `[start, end]` as `(start, seconds)`, or
    /// `None` when nothing positive is left.
    ///
    /// An entry that no bound cuts keeps its logged duration bit for bit.
    pub fn overlap(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, f64)> {
        let duration_secs = sanitize_secs(self.duration_secs);
        if duration_secs == 0.0 || self.start_time >= end {
            return None;
        }

        let entry_end = self.end_time();
        if self.start_time >= start && entry_end <= end {
            return Some((self.start_time, duration_secs));
        }

        let clipped_start = self.start_time.max(start);
        let clipped_end = entry_end.min(end);
        if clipped_start >= clipped_end {
            return None;
        }
        Some((clipped_start, duration_to_seconds(clipped_end - clipped_start)))
    }
}

/// Finite positive seconds, anything else as zero.
pub fn sanitize_secs(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

/// Converts fractional seconds to a chrono duration. Nanosecond resolution
/// where it fits, milliseconds beyond that; saturates at the largest duration.
pub fn seconds_to_duration(secs: f64) -> Duration {
    let secs = sanitize_secs(secs);
    if secs < MAX_NANOSECOND_SECS {
        Duration::nanoseconds((secs * 1e9).round() as i64)
    } else {
        Duration::milliseconds((secs * 1e3).round() as i64)
    }
}

pub fn duration_to_seconds(duration: Duration) -> f64 {
    match duration.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => duration.num_milliseconds() as f64 / 1e3,
    }
}
