//! Dashboard read models derived from the deal and contact collections.

pub mod overview;

pub use overview::{stage_distribution, value_bars, PipelineStats, StageShare, ValueBar};
