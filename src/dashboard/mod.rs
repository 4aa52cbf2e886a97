pub mod controller;
pub mod snapshot;
pub mod state;

pub use controller::{DashboardController, RefreshOutcome};
pub use snapshot::DashboardSnapshot;
pub use state::{derive_view_state, DashboardFilter, ViewState};
