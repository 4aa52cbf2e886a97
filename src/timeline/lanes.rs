use serde::{Deserialize, Serialize};

use crate::models::{MachineStatus, TimelineWindow};
use crate::timeline::segmenter::TimelineSegment;

/// `(start, duration)` pair consumed by the timeline chart. Ticks are Unix
/// epoch milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub start_ticks: i64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLane {
    pub status: MachineStatus,
    pub name: String,
    pub color: String,
    pub points: Vec<TimelinePoint>,
}

/// One stacked timeline row: a lane per defined status sharing the same row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLanes {
    pub window: TimelineWindow,
    pub no_data: bool,
    pub lanes: Vec<TimelineLane>,
}

impl TimelineLanes {
    pub fn empty(window: TimelineWindow) -> Self {
        Self {
            window,
            no_data: true,
            lanes: Vec::new(),
        }
    }

    /// Partitions segments by status into the Off, Loaded and On lanes.
    /// Segments of unknown status are not drawn.
    pub fn from_segments(segments: &[TimelineSegment], window: TimelineWindow) -> Self {
        if segments.is_empty() {
            return Self::empty(window);
        }

        let lanes = MachineStatus::DEFINED
            .iter()
            .map(|status| TimelineLane {
                status: *status,
                name: status.label().to_string(),
                color: status.color().to_string(),
                points: segments
                    .iter()
                    .filter(|segment| segment.status == *status)
                    .map(|segment| TimelinePoint {
                        start_ticks: segment.start_time.timestamp_millis(),
                        duration_secs: segment.duration_secs,
                    })
                    .collect(),
            })
            .collect();

        Self {
            window,
            no_data: false,
            lanes,
        }
    }

    pub fn lane(&self, status: MachineStatus) -> Option<&TimelineLane> {
        self.lanes.iter().find(|lane| lane.status == status)
    }
}
