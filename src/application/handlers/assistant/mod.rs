//! Assistant handlers: the draft collaborator and per-view request tracking.

mod pending_drafts;
mod request_draft;

pub use pending_drafts::{PendingDrafts, SubmitOutcome, ViewKey};
pub use request_draft::DraftAssistant;
