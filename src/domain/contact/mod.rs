//! Contact domain module.
//!
//! Contacts are people associated with zero or more deals. They are created
//! through the add-contact form (`ContactDraft`), never edited, and removed
//! by an explicit delete.

mod aggregate;
mod draft;
mod search;

pub use aggregate::{Contact, LastContacted};
pub use draft::{ContactDraft, DEFAULT_PHONE};
pub use search::search_contacts;
