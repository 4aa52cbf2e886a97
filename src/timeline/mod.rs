pub mod lanes;
pub mod segmenter;

pub use lanes::{TimelineLane, TimelineLanes, TimelinePoint};
pub use segmenter::{segment, TimelineSegment};
