//! CrmSession - the explicitly owned session root.
//!
//! A session is built once at startup, owns the store and the assistant,
//! and is dropped at the end. Dropping it aborts any draft requests that are
//! still outstanding.

use std::sync::Arc;
use tracing::info;

use super::handlers::{
    AddContactCommand, AddContactHandler, DeleteContactCommand, DeleteContactHandler,
    DraftAssistant, DragState, MoveDealCommand, MoveDealHandler, PendingDrafts, SubmitOutcome,
    ViewKey,
};
use super::store::{CrmStore, MutationOutcome};
use crate::adapters::fixtures::{FixtureError, SeedData};
use crate::domain::assistant::AssistantContext;
use crate::domain::contact::{Contact, ContactDraft};
use crate::domain::dashboard::PipelineStats;
use crate::domain::deal::DealStage;
use crate::domain::foundation::{ContactId, DealId, ValidationError};
use crate::ports::AIProvider;

/// One user's working session.
pub struct CrmSession {
    store: Arc<CrmStore>,
    add_contact: AddContactHandler,
    delete_contact: DeleteContactHandler,
    move_deal: MoveDealHandler,
    drag: DragState,
    assistant: Arc<DraftAssistant>,
    drafts: PendingDrafts,
}

impl CrmSession {
    /// Creates a session over an existing store.
    pub fn new(store: Arc<CrmStore>, provider: Arc<dyn AIProvider>) -> Self {
        let assistant = Arc::new(DraftAssistant::new(provider));
        Self {
            add_contact: AddContactHandler::new(Arc::clone(&store)),
            delete_contact: DeleteContactHandler::new(Arc::clone(&store)),
            move_deal: MoveDealHandler::new(Arc::clone(&store)),
            drag: DragState::new(),
            drafts: PendingDrafts::new(Arc::clone(&assistant)),
            assistant,
            store,
        }
    }

    /// Creates a session seeded from the embedded fixtures.
    pub fn seeded(provider: Arc<dyn AIProvider>) -> Result<Self, FixtureError> {
        let seed = SeedData::load()?;
        info!(
            contacts = seed.contacts.len(),
            deals = seed.deals.len(),
            activities = seed.activities.len(),
            "Session seeded"
        );
        Ok(Self::new(Arc::new(CrmStore::from_seed(seed)), provider))
    }

    pub fn store(&self) -> &Arc<CrmStore> {
        &self.store
    }

    pub fn drafts(&self) -> &PendingDrafts {
        &self.drafts
    }

    /// Headline numbers for the dashboard.
    pub fn stats(&self) -> PipelineStats {
        PipelineStats::compute(&self.store.deals(), &self.store.contacts())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Contacts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_contact(&self, draft: ContactDraft) -> Result<Contact, ValidationError> {
        self.add_contact
            .handle(AddContactCommand { draft })
            .map(|result| result.contact)
    }

    pub fn delete_contact(&self, contact_id: &ContactId) -> MutationOutcome {
        self.delete_contact.handle(DeleteContactCommand {
            contact_id: contact_id.clone(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    pub fn move_deal(&self, deal_id: &DealId, target: DealStage) -> MutationOutcome {
        self.move_deal.handle(MoveDealCommand {
            deal_id: deal_id.clone(),
            target,
        })
    }

    pub fn begin_drag(&mut self, deal_id: DealId) {
        self.drag.begin_drag(deal_id);
    }

    pub fn drop_on(&mut self, stage: DealStage) -> MutationOutcome {
        self.drag.drop_on(stage, &self.move_deal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Assistant
    // ─────────────────────────────────────────────────────────────────────────

    /// Generates text inline. Never fails; see [`DraftAssistant`].
    pub async fn request_draft(&self, context: &AssistantContext) -> String {
        self.assistant.request_draft(context).await
    }

    /// Starts a background request for `view`. Refused with
    /// [`SubmitOutcome::NoRuntime`] when called outside a Tokio runtime.
    pub fn submit_draft(&self, view: ViewKey, context: AssistantContext) -> SubmitOutcome {
        self.drafts.submit(view, context)
    }
}
