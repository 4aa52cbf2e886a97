pub mod bar;
pub mod config;
pub mod engine;

pub use bar::{BarSection, StackedBar};
pub use config::{AggregationConfig, DurationPolicy};
pub use engine::{aggregate, aggregate_with, AggregateResult, StatusProportions};
