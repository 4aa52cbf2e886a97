use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregateResult, StackedBar};
use crate::dashboard::state::{DashboardFilter, ViewState};
use crate::models::ComponentValue;
use crate::timeline::TimelineLanes;

/// Everything the presentation layer needs after one recomputation pass.
/// Replaces the previously displayed snapshot wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub sequence: u64,
    pub generated_at: DateTime<Utc>,
    pub filter: DashboardFilter,
    #[serde(flatten)]
    pub view: ViewState,
    pub aggregate: AggregateResult,
    pub bar: StackedBar,
    pub timeline: TimelineLanes,
    pub components: Vec<ComponentValue>,
}
