//! DeleteContactHandler - Command handler for removing a contact.
//!
//! Deals that reference the contact are left in place; their contact id
//! then resolves to the unknown-contact label.

use std::sync::Arc;
use tracing::info;

use crate::application::store::{CrmStore, MutationOutcome};
use crate::domain::foundation::ContactId;

/// Command to delete a contact.
#[derive(Debug, Clone)]
pub struct DeleteContactCommand {
    pub contact_id: ContactId,
}

/// Handler for deleting contacts.
pub struct DeleteContactHandler {
    store: Arc<CrmStore>,
}

impl DeleteContactHandler {
    pub fn new(store: Arc<CrmStore>) -> Self {
        Self { store }
    }

    /// Removes the contact. Deleting an absent id is not an error.
    pub fn handle(&self, cmd: DeleteContactCommand) -> MutationOutcome {
        let outcome = self.store.remove_contact(&cmd.contact_id);

        if outcome.is_applied() {
            let orphaned = self
                .store
                .deals()
                .iter()
                .filter(|d| d.contact_id() == &cmd.contact_id)
                .count();
            info!(contact_id = %cmd.contact_id, orphaned_deals = orphaned, "Contact deleted");
        }

        outcome
    }
}
