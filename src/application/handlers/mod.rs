//! Application handlers.
//!
//! Command handlers that orchestrate store mutations and assistant requests.

pub mod assistant;
pub mod contact;
pub mod deal;

pub use assistant::{DraftAssistant, PendingDrafts, SubmitOutcome, ViewKey};
pub use contact::{
    AddContactCommand, AddContactHandler, AddContactResult, DeleteContactCommand,
    DeleteContactHandler,
};
pub use deal::{DragState, MoveDealCommand, MoveDealHandler};
