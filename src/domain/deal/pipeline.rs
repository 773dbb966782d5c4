//! Kanban pipeline: per-stage columns and the stage transition.
//!
//! Both functions are pure. The store owns the collection and swaps in the
//! snapshot returned by [`transition_stage`].

use serde::Serialize;

use super::{Deal, DealStage};
use crate::domain::foundation::{DealId, Money, StateMachine};

/// One board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn<'a> {
    pub stage: DealStage,
    pub label: &'static str,
    /// Deals in this stage, in collection order.
    pub deals: Vec<&'a Deal>,
    pub total_value: Money,
}

impl StageColumn<'_> {
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }
}

/// All five columns, always in stage order, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineBoard<'a> {
    columns: Vec<StageColumn<'a>>,
}

impl<'a> PipelineBoard<'a> {
    pub fn columns(&self) -> &[StageColumn<'a>] {
        &self.columns
    }

    pub fn column(&self, stage: DealStage) -> &StageColumn<'a> {
        &self.columns[stage.column()]
    }

    /// Sum of every column's value.
    pub fn total_value(&self) -> Money {
        self.columns.iter().map(|c| c.total_value).sum()
    }

    pub fn deal_count(&self) -> usize {
        self.columns.iter().map(StageColumn::len).sum()
    }
}

/// Partitions deals into the five stage columns.
///
/// Every deal lands in exactly one column and column totals add up to the
/// collection total.
pub fn group_by_stage(deals: &[Deal]) -> PipelineBoard<'_> {
    let mut columns: Vec<StageColumn<'_>> = DealStage::ALL
        .iter()
        .map(|&stage| StageColumn {
            stage,
            label: stage.label(),
            deals: Vec::new(),
            total_value: Money::ZERO,
        })
        .collect();

    for deal in deals {
        let column = &mut columns[deal.stage().column()];
        column.total_value = column.total_value + deal.value();
        column.deals.push(deal);
    }

    PipelineBoard { columns }
}

/// Moves one deal to `target`, returning the new collection.
///
/// Any stage may follow any other. Returns `None` when nothing would change:
/// the id is unknown, or the deal already sits in `target`.
pub fn transition_stage(deals: &[Deal], deal_id: &DealId, target: DealStage) -> Option<Vec<Deal>> {
    let current = deals.iter().find(|d| d.id() == deal_id)?.stage();
    if current == target || !current.can_transition_to(&target) {
        return None;
    }

    Some(
        deals
            .iter()
            .map(|deal| {
                if deal.id() == deal_id {
                    deal.moved_to(target)
                } else {
                    deal.clone()
                }
            })
            .collect(),
    )
}
