//! Deal domain module.
//!
//! Deals move through a five-stage pipeline rendered as a kanban board.
//! The stage is the only thing that changes once a deal exists, and every
//! stage can be reached from every other.

mod aggregate;
mod pipeline;
mod stage;

pub use aggregate::Deal;
pub use pipeline::{group_by_stage, transition_stage, PipelineBoard, StageColumn};
pub use stage::DealStage;
