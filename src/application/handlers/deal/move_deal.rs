//! MoveDealHandler - Command handler for kanban stage moves.
//!
//! Any stage may follow any other. The drag gesture is modeled by
//! [`DragState`]: a drag records the deal, a drop on a column moves it.

use std::sync::Arc;
use tracing::info;

use crate::application::store::{CrmStore, MutationOutcome};
use crate::domain::deal::DealStage;
use crate::domain::foundation::DealId;

/// Command to move a deal to another stage.
#[derive(Debug, Clone)]
pub struct MoveDealCommand {
    pub deal_id: DealId,
    pub target: DealStage,
}

/// Handler for stage moves.
pub struct MoveDealHandler {
    store: Arc<CrmStore>,
}

impl MoveDealHandler {
    pub fn new(store: Arc<CrmStore>) -> Self {
        Self { store }
    }

    /// Applies the move. Unknown ids and same-stage drops change nothing.
    pub fn handle(&self, cmd: MoveDealCommand) -> MutationOutcome {
        let from = self.store.deal(&cmd.deal_id).map(|d| d.stage());
        let outcome = self.store.update_deal_stage(&cmd.deal_id, cmd.target);

        if let (MutationOutcome::Applied, Some(from)) = (outcome, from) {
            info!(deal_id = %cmd.deal_id, %from, to = %cmd.target, "Deal moved");
        }

        outcome
    }
}

/// The deal currently being dragged on the board, if any.
#[derive(Debug, Default)]
pub struct DragState {
    dragged: Option<DealId>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts dragging `deal_id`, replacing any earlier drag.
    pub fn begin_drag(&mut self, deal_id: DealId) {
        self.dragged = Some(deal_id);
    }

    pub fn dragged(&self) -> Option<&DealId> {
        self.dragged.as_ref()
    }

    /// Abandons the drag without moving anything.
    pub fn cancel(&mut self) {
        self.dragged = None;
    }

    /// Drops the dragged deal onto `stage` and ends the drag.
    ///
    /// A drop with nothing being dragged is a no-op.
    pub fn drop_on(&mut self, stage: DealStage, handler: &MoveDealHandler) -> MutationOutcome {
        match self.dragged.take() {
            Some(deal_id) => handler.handle(MoveDealCommand {
                deal_id,
                target: stage,
            }),
            None => MutationOutcome::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures::SeedData;

    fn seeded() -> (MoveDealHandler, Arc<CrmStore>) {
        let store = Arc::new(CrmStore::from_seed(SeedData::load().unwrap()));
        (MoveDealHandler::new(Arc::clone(&store)), store)
    }

    fn d(id: &str) -> DealId {
        DealId::new(id).unwrap()
    }

    #[test]
    fn moves_deal_between_any_stages() {
        let (handler, store) = seeded();

        let outcome = handler.handle(MoveDealCommand {
            deal_id: d("d4"),
            target: DealStage::Closed,
        });

        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(store.deal(&d("d4")).unwrap().stage(), DealStage::Closed);
    }

    #[test]
    fn unknown_deal_is_ignored() {
        let (handler, store) = seeded();
        let revision = store.revision();

        let outcome = handler.handle(MoveDealCommand {
            deal_id: d("d99"),
            target: DealStage::Lead,
        });

        assert_eq!(outcome, MutationOutcome::Unchanged);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn drop_moves_dragged_deal_and_clears_drag() {
        let (handler, store) = seeded();
        let mut drag = DragState::new();

        drag.begin_drag(d("d2"));
        let outcome = drag.drop_on(DealStage::Negotiation, &handler);

        assert_eq!(outcome, MutationOutcome::Applied);
        assert!(drag.dragged().is_none());
        assert_eq!(store.deal(&d("d2")).unwrap().stage(), DealStage::Negotiation);
    }

    #[test]
    fn drop_without_drag_is_a_no_op() {
        let (handler, store) = seeded();
        let before = store.deals();
        let mut drag = DragState::new();

        assert_eq!(drag.drop_on(DealStage::Closed, &handler), MutationOutcome::Unchanged);
        assert!(Arc::ptr_eq(&before, &store.deals()));
    }

    #[test]
    fn cancelled_drag_does_not_move() {
        let (handler, store) = seeded();
        let mut drag = DragState::new();

        drag.begin_drag(d("d1"));
        drag.cancel();
        drag.drop_on(DealStage::Lead, &handler);

        assert_eq!(store.deal(&d("d1")).unwrap().stage(), DealStage::Proposal);
    }
}
