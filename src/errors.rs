use chrono::{DateTime, Utc};
use thiserror::Error;

/// Precondition failures of the aggregation and timeline computations.
///
/// An empty input is not an error; it produces the "no data" result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("INVALID_RANGE: range start {start} is after range end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("INVALID_WINDOW: window start {start} is not before window end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

pub type DashboardResult<T> = Result<T, DashboardError>;
