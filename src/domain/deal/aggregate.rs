//! Deal entity.
//!
//! # Ownership
//!
//! A deal names its contact by id only. The contact may be deleted while
//! the deal lives on; resolving the id is a lookup that can miss.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DealStage;
use crate::domain::foundation::{ContactId, DealId, Money, Probability, StateMachine};

/// A tracked sales opportunity.
///
/// # Invariants
///
/// - `stage` is always one of the five pipeline stages
/// - `stage` is the only field that changes after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    id: DealId,
    title: String,
    value: Money,
    stage: DealStage,
    contact_id: ContactId,
    expected_close_date: NaiveDate,
    probability: Probability,
}

impl Deal {
    pub fn new(
        id: DealId,
        title: impl Into<String>,
        value: Money,
        stage: DealStage,
        contact_id: ContactId,
        expected_close_date: NaiveDate,
        probability: Probability,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            value,
            stage,
            contact_id,
            expected_close_date,
            probability,
        }
    }

    /// Returns a copy of this deal sitting in `target`.
    ///
    /// Every stage is reachable, so this never fails.
    pub fn moved_to(&self, target: DealStage) -> Self {
        let stage = self.stage.transition_to(target).unwrap_or(target);
        Self {
            stage,
            ..self.clone()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DealId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> Money {
        self.value
    }

    pub fn stage(&self) -> DealStage {
        self.stage
    }

    /// Lookup key for the associated contact (not ownership).
    pub fn contact_id(&self) -> &ContactId {
        &self.contact_id
    }

    pub fn expected_close_date(&self) -> NaiveDate {
        self.expected_close_date
    }

    pub fn probability(&self) -> Probability {
        self.probability
    }
}
