//! Contact command handlers.

mod add_contact;
mod delete_contact;

pub use add_contact::{AddContactCommand, AddContactHandler, AddContactResult};
pub use delete_contact::{DeleteContactCommand, DeleteContactHandler};
