//! Application layer - store, session and command handlers.
//!
//! This layer owns the session state and coordinates between the domain and
//! the AI provider port.

pub mod handlers;
pub mod session;
pub mod store;

pub use handlers::{
    AddContactCommand, AddContactHandler, AddContactResult, DeleteContactCommand,
    DeleteContactHandler, DraftAssistant, DragState, MoveDealCommand, MoveDealHandler,
    PendingDrafts, SubmitOutcome, ViewKey,
};
pub use session::CrmSession;
pub use store::{Collection, CrmStore, MutationOutcome, UNKNOWN_CONTACT};
