//! Machine status dashboard core.
//!
//! Reads machine status logs from SQLite, turns them into time-in-state
//! proportions over a date range and into a clipped timeline over a trailing
//! window, and packages both for a chart front end.

pub mod aggregation;
pub mod dashboard;
pub mod db;
pub mod demo;
pub mod errors;
pub mod models;
pub mod settings;
pub mod timeline;
pub mod utils;

pub use aggregation::{aggregate, aggregate_with, AggregateResult, AggregationConfig};
pub use dashboard::{DashboardController, DashboardFilter, DashboardSnapshot, RefreshOutcome};
pub use db::Database;
pub use errors::{DashboardError, DashboardResult};
pub use models::{DateRange, MachineStatus, StatusLogEntry, TimelineWindow};
pub use settings::{DashboardSettings, SettingsStore};
pub use timeline::{segment, TimelineSegment};

/// Initialise logging (reads RUST_LOG env var, defaults to info).
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
