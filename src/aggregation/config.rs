use serde::{Deserialize, Serialize};

/// How much of a log entry counts towards the time-in-state totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DurationPolicy {
    /// The whole logged duration counts, even the part outside the range.
    #[default]
    WholeEntry,
    /// Only the overlap between the entry and the range counts.
    ClipToRange,
}

/// Configuration for the time-in-state aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationConfig {
    #[serde(default)]
    pub duration_policy: DurationPolicy,
}

impl AggregationConfig {
    pub fn clipped() -> Self {
        Self {
            duration_policy: DurationPolicy::ClipToRange,
        }
    }
}
