//! DealStage enum for the sales pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Pipeline stage a deal currently occupies.
///
/// Variant order is the board's column order. It says nothing about which
/// moves are allowed: any stage can be reached from any other, and `Closed`
/// is not sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStage {
    #[default]
    Lead,
    Contacted,
    Proposal,
    Negotiation,
    Closed,
}

impl DealStage {
    /// All stages in column order.
    pub const ALL: [DealStage; 5] = [
        DealStage::Lead,
        DealStage::Contacted,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::Closed,
    ];

    /// Column heading shown on the board.
    pub fn label(&self) -> &'static str {
        match self {
            DealStage::Lead => "New Leads",
            DealStage::Contacted => "Contacted",
            DealStage::Proposal => "Proposal Sent",
            DealStage::Negotiation => "Negotiation",
            DealStage::Closed => "Closed Won",
        }
    }

    /// Upper-case wire name (`LEAD`, `PROPOSAL`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "LEAD",
            DealStage::Contacted => "CONTACTED",
            DealStage::Proposal => "PROPOSAL",
            DealStage::Negotiation => "NEGOTIATION",
            DealStage::Closed => "CLOSED",
        }
    }

    /// Position of this stage's column, 0-based.
    pub fn column(&self) -> usize {
        *self as usize
    }

    /// Returns true for deals counted as won.
    pub fn is_won(&self) -> bool {
        matches!(self, DealStage::Closed)
    }
}

impl StateMachine for DealStage {
    fn can_transition_to(&self, _target: &Self) -> bool {
        true
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL.to_vec()
    }
}

impl fmt::Display for DealStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::invalid_format("stage", format!("unknown stage '{}'", s)))
    }
}
