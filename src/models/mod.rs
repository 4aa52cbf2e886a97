pub mod log_entry;
pub mod machine;
pub mod range;
pub mod status;

pub use log_entry::{duration_to_seconds, sanitize_secs, seconds_to_duration, StatusLogEntry};
pub use machine::{ComponentValue, Machine};
pub use range::{DateRange, TimelineWindow};
pub use status::MachineStatus;
