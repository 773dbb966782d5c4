//! CrmStore - the in-memory owner of the session's collections.
//!
//! Every mutation builds a fresh collection and swaps it in whole. Readers
//! receive an `Arc` snapshot and keep seeing exactly that state until they
//! read again. A mutation that changes nothing leaves the snapshot (and the
//! revision) untouched, so pointer equality on snapshots is a valid change
//! check.
//!
//! No mutation returns an error. Unknown ids are no-ops reported as
//! [`MutationOutcome::Unchanged`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::adapters::fixtures::SeedData;
use crate::domain::activity::Activity;
use crate::domain::contact::Contact;
use crate::domain::deal::{transition_stage, Deal, DealStage};
use crate::domain::foundation::{ContactId, DealId};

/// Label shown for a deal whose contact no longer exists.
pub const UNKNOWN_CONTACT: &str = "Unknown Contact";

/// A full replacement for one collection.
#[derive(Debug, Clone)]
pub enum Collection {
    Contacts(Vec<Contact>),
    Deals(Vec<Deal>),
    Activities(Vec<Activity>),
}

impl Collection {
    fn name(&self) -> &'static str {
        match self {
            Collection::Contacts(_) => "contacts",
            Collection::Deals(_) => "deals",
            Collection::Activities(_) => "activities",
        }
    }

    fn len(&self) -> usize {
        match self {
            Collection::Contacts(items) => items.len(),
            Collection::Deals(items) => items.len(),
            Collection::Activities(items) => items.len(),
        }
    }
}

/// Whether a mutation produced a new snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Unchanged,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    contacts: Arc<Vec<Contact>>,
    deals: Arc<Vec<Deal>>,
    activities: Arc<Vec<Activity>>,
    revision: u64,
}

impl StoreState {
    fn bump(&mut self) -> MutationOutcome {
        self.revision += 1;
        MutationOutcome::Applied
    }
}

/// Session-scoped store for contacts, deals and activities.
#[derive(Debug, Default)]
pub struct CrmStore {
    state: RwLock<StoreState>,
}

impl CrmStore {
    /// Creates an empty store at revision 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given seed collections.
    pub fn from_seed(seed: SeedData) -> Self {
        let store = Self::new();
        store.replace_all(Collection::Contacts(seed.contacts));
        store.replace_all(Collection::Deals(seed.deals));
        store.replace_all(Collection::Activities(seed.activities));
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────────

    pub fn contacts(&self) -> Arc<Vec<Contact>> {
        Arc::clone(&self.read().contacts)
    }

    pub fn deals(&self) -> Arc<Vec<Deal>> {
        Arc::clone(&self.read().deals)
    }

    pub fn activities(&self) -> Arc<Vec<Activity>> {
        Arc::clone(&self.read().activities)
    }

    /// Number of applied mutations since construction.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replaces one collection wholesale. Always applied.
    pub fn replace_all(&self, collection: Collection) -> MutationOutcome {
        let name = collection.name();
        let count = collection.len();

        let mut state = self.write();
        match collection {
            Collection::Contacts(items) => state.contacts = Arc::new(items),
            Collection::Deals(items) => state.deals = Arc::new(items),
            Collection::Activities(items) => state.activities = Arc::new(items),
        }
        let outcome = state.bump();

        debug!(collection = name, count, revision = state.revision, "Collection replaced");
        outcome
    }

    /// Puts `contact` at the front of the directory.
    ///
    /// Id uniqueness is the caller's concern; a duplicate id is stored as is.
    /// Always applies; returns the revision this add produced.
    pub fn add_contact(&self, contact: Contact) -> u64 {
        let mut state = self.write();
        let contact_id = contact.id().clone();

        let mut contacts = Vec::with_capacity(state.contacts.len() + 1);
        contacts.push(contact);
        contacts.extend(state.contacts.iter().cloned());
        state.contacts = Arc::new(contacts);
        state.bump();

        debug!(%contact_id, revision = state.revision, "Contact added");
        state.revision
    }

    /// Removes the contact with `id`, if any. Deals pointing at it are kept.
    pub fn remove_contact(&self, id: &ContactId) -> MutationOutcome {
        let mut state = self.write();

        if !state.contacts.iter().any(|c| c.id() == id) {
            debug!(contact_id = %id, "Remove ignored, contact not found");
            return MutationOutcome::Unchanged;
        }

        let remaining: Vec<Contact> = state
            .contacts
            .iter()
            .filter(|c| c.id() != id)
            .cloned()
            .collect();
        state.contacts = Arc::new(remaining);
        let outcome = state.bump();

        debug!(contact_id = %id, revision = state.revision, "Contact removed");
        outcome
    }

    /// Moves deal `id` to `stage`. Unknown ids and same-stage moves are no-ops.
    pub fn update_deal_stage(&self, id: &DealId, stage: DealStage) -> MutationOutcome {
        let mut state = self.write();

        let Some(deals) = transition_stage(&state.deals, id, stage) else {
            debug!(deal_id = %id, %stage, "Stage update ignored");
            return MutationOutcome::Unchanged;
        };
        state.deals = Arc::new(deals);
        let outcome = state.bump();

        debug!(deal_id = %id, %stage, revision = state.revision, "Deal stage updated");
        outcome
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    pub fn contact(&self, id: &ContactId) -> Option<Contact> {
        self.read().contacts.iter().find(|c| c.id() == id).cloned()
    }

    pub fn deal(&self, id: &DealId) -> Option<Deal> {
        self.read().deals.iter().find(|d| d.id() == id).cloned()
    }

    /// Display name for a contact id, or [`UNKNOWN_CONTACT`] if it dangles.
    pub fn contact_name(&self, id: &ContactId) -> String {
        self.read()
            .contacts
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| UNKNOWN_CONTACT.to_string())
    }

    /// Company for a contact id, or an empty string if it dangles.
    pub fn contact_company(&self, id: &ContactId) -> String {
        self.read()
            .contacts
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.company().to_string())
            .unwrap_or_default()
    }

    /// The deal an activity refers to, if it has one and it still exists.
    pub fn deal_for_activity(&self, activity: &Activity) -> Option<Deal> {
        activity.deal_id().and_then(|id| self.deal(id))
    }
}
