//! AddContactHandler - Command handler for the add-contact form.
//!
//! Presence checks run here, at the point of entry. The store itself accepts
//! any contact it is given.

use std::sync::Arc;
use tracing::info;

use crate::application::store::CrmStore;
use crate::domain::contact::{Contact, ContactDraft};
use crate::domain::foundation::ValidationError;

/// Command to add a contact from form input.
#[derive(Debug, Clone)]
pub struct AddContactCommand {
    pub draft: ContactDraft,
}

/// Result of a successful add.
#[derive(Debug, Clone)]
pub struct AddContactResult {
    /// The contact as stored, with generated id, avatar and defaults.
    pub contact: Contact,
    /// Store revision after the add.
    pub revision: u64,
}

/// Handler for adding contacts.
pub struct AddContactHandler {
    store: Arc<CrmStore>,
}

impl AddContactHandler {
    pub fn new(store: Arc<CrmStore>) -> Self {
        Self { store }
    }

    pub fn handle(&self, cmd: AddContactCommand) -> Result<AddContactResult, ValidationError> {
        // 1. Validate and build
        let contact = cmd.draft.into_contact()?;

        // 2. Prepend
        let revision = self.store.add_contact(contact.clone());

        info!(contact_id = %contact.id(), company = contact.company(), revision, "Contact created");

        Ok(AddContactResult { contact, revision })
    }
}
