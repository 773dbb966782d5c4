//! Deal command handlers.

mod move_deal;

pub use move_deal::{DragState, MoveDealCommand, MoveDealHandler};
