use serde::Serialize;

use crate::domain::contact::Contact;
use crate::domain::deal::{Deal, DealStage};
use crate::domain::foundation::Money;

/// Headline numbers shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    /// Sum of every deal's value, regardless of stage
    pub total_pipeline: Money,
    pub active_deals: usize,
    pub total_contacts: usize,
    /// Deals sitting in CLOSED
    pub won_deals: usize,
}

impl PipelineStats {
    pub fn compute(deals: &[Deal], contacts: &[Contact]) -> Self {
        Self {
            total_pipeline: deals.iter().map(Deal::value).sum(),
            active_deals: deals.len(),
            total_contacts: contacts.len(),
            won_deals: deals.iter().filter(|d| d.stage().is_won()).count(),
        }
    }
}

/// One bar in the pipeline value chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBar {
    pub name: String,
    pub value: Money,
    pub stage: DealStage,
}

/// Characters of the deal title kept in a bar label
const BAR_LABEL_CHARS: usize = 10;

/// One bar per deal, in collection order.
pub fn value_bars(deals: &[Deal]) -> Vec<ValueBar> {
    deals
        .iter()
        .map(|d| ValueBar {
            name: format!("{}...", d.title().chars().take(BAR_LABEL_CHARS).collect::<String>()),
            value: d.value(),
            stage: d.stage(),
        })
        .collect()
}

/// Slice of the deals-by-stage chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageShare {
    pub stage: DealStage,
    pub count: usize,
}

/// Deal counts per stage.
///
/// Stages with no deals are left out; the rest appear in the order their
/// first deal appears in the collection.
pub fn stage_distribution(deals: &[Deal]) -> Vec<StageShare> {
    let mut shares: Vec<StageShare> = Vec::new();
    for deal in deals {
        match shares.iter_mut().find(|s| s.stage == deal.stage()) {
            Some(share) => share.count += 1,
            None => shares.push(StageShare {
                stage: deal.stage(),
                count: 1,
            }),
        }
    }
    shares
}

#[cfg(test)]
#[path = "overview_test.rs"]
mod overview_test;
