use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::aggregation::{aggregate_with, AggregateResult, DurationPolicy, StackedBar};
use crate::dashboard::snapshot::DashboardSnapshot;
use crate::dashboard::state::{derive_view_state, DashboardFilter};
use crate::db::Database;
use crate::errors::DashboardResult;
use crate::models::{ComponentValue, Machine, TimelineWindow};
use crate::settings::DashboardSettings;
use crate::timeline::{segment, TimelineLanes};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// What happened to a finished pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RefreshOutcome {
    Applied(Box<DashboardSnapshot>),
    /// A later pass was already displayed; this one was dropped.
    Discarded { sequence: u64, current: u64 },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied(_))
    }
}

/// Drives recomputation passes for the dashboard.
///
/// Passes are independent and may finish out of order. Each one takes a
/// number from a monotonically increasing counter, and a finished pass only
/// replaces the displayed snapshot when no later-numbered pass has been
/// applied.
#[derive(Clone)]
pub struct DashboardController {
    db: Database,
    settings: DashboardSettings,
    machines: Arc<Mutex<Vec<Machine>>>,
    current: Arc<Mutex<Option<DashboardSnapshot>>>,
    next_sequence: Arc<AtomicU64>,
}

impl DashboardController {
    pub fn new(db: Database, settings: DashboardSettings) -> Self {
        Self {
            db,
            settings,
            machines: Arc::new(Mutex::new(Vec::new())),
            current: Arc::new(Mutex::new(None)),
            next_sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Reloads the machine list used for type filtering.
    pub async fn load_machines(&self) -> Result<usize> {
        let machines = self.db.all_machines().await?;
        let count = machines.len();
        *self.machines.lock().await = machines;
        log_info!("Loaded {count} machines");
        Ok(count)
    }

    pub async fn machines(&self) -> Vec<Machine> {
        self.machines.lock().await.clone()
    }

    pub async fn current(&self) -> Option<DashboardSnapshot> {
        self.current.lock().await.clone()
    }

    pub async fn refresh(&self, filter: &DashboardFilter) -> DashboardResult<RefreshOutcome> {
        self.refresh_at(filter, Utc::now()).await
    }

    /// One full pass with the timeline window ending at `now`.
    pub async fn refresh_at(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> DashboardResult<RefreshOutcome> {
        let sequence = self.begin_pass();
        let snapshot = self.compute_snapshot(sequence, filter, now).await?;
        Ok(self.apply(snapshot).await)
    }

    /// Reserves the number of a new pass.
    pub fn begin_pass(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Builds the snapshot for a pass. Failed fetches degrade to empty data.
    pub async fn compute_snapshot(
        &self,
        sequence: u64,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> DashboardResult<DashboardSnapshot> {
        let machines = self.machines().await;
        let view = derive_view_state(filter, &machines, &self.settings);
        let window = TimelineWindow::trailing(now, self.settings.timeline_window_hours.max(1))?;

        let (aggregate, timeline, components) = match &filter.machine_name {
            None => (
                AggregateResult::NoData,
                TimelineLanes::empty(window),
                Vec::new(),
            ),
            Some(machine_name) => {
                let aggregate = self.aggregate_for(machine_name, filter).await?;
                let timeline = self.timeline_for(machine_name, window).await?;
                let components = self.components_for(machine_name).await;
                (aggregate, timeline, components)
            }
        };

        Ok(DashboardSnapshot {
            sequence,
            generated_at: now,
            filter: filter.clone(),
            view,
            bar: StackedBar::from_aggregate(&aggregate),
            aggregate,
            timeline,
            components,
        })
    }

    /// Replaces the displayed snapshot unless a later pass got there first.
    pub async fn apply(&self, snapshot: DashboardSnapshot) -> RefreshOutcome {
        let mut guard = self.current.lock().await;
        if let Some(current) = guard.as_ref() {
            if current.sequence > snapshot.sequence {
                log_info!(
                    "Discarding pass {} (pass {} already applied)",
                    snapshot.sequence,
                    current.sequence
                );
                return RefreshOutcome::Discarded {
                    sequence: snapshot.sequence,
                    current: current.sequence,
                };
            }
        }
        *guard = Some(snapshot.clone());
        RefreshOutcome::Applied(Box::new(snapshot))
    }

    async fn aggregate_for(
        &self,
        machine_name: &str,
        filter: &DashboardFilter,
    ) -> DashboardResult<AggregateResult> {
        let config = self.settings.aggregation_config();
        let fetched = match config.duration_policy {
            DurationPolicy::WholeEntry => self.db.fetch_status_logs(machine_name, &filter.range).await,
            DurationPolicy::ClipToRange => {
                self.db
                    .fetch_overlapping_logs(machine_name, &filter.range)
                    .await
            }
        };
        let entries = or_empty(fetched, "status logs", machine_name);
        aggregate_with(&entries, filter.range.start, filter.range.end, &config)
    }

    async fn timeline_for(
        &self,
        machine_name: &str,
        window: TimelineWindow,
    ) -> DashboardResult<TimelineLanes> {
        let fetched = self.db.fetch_timeline_logs(machine_name, &window).await;
        let entries = or_empty(fetched, "timeline logs", machine_name);
        let segments = segment(&entries, window.start, window.end)?;
        Ok(TimelineLanes::from_segments(&segments, window))
    }

    async fn components_for(&self, machine_name: &str) -> Vec<ComponentValue> {
        let fetched = self.db.latest_component_values(machine_name).await;
        or_empty(fetched, "component values", machine_name)
    }
}

fn or_empty<T>(fetched: Result<Vec<T>>, what: &str, machine_name: &str) -> Vec<T> {
    fetched.unwrap_or_else(|err| {
        log_warn!("Failed to load {what} for {machine_name}: {err:#}");
        Vec::new()
    })
}
