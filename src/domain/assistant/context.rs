//! What the assistant is asked about.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::contact::Contact;
use crate::domain::deal::{Deal, DealStage};
use crate::domain::foundation::Money;

/// Goal used when the user leaves the email goal blank.
pub const DEFAULT_EMAIL_GOAL: &str = "Touching base regarding our services";

/// Voice of a drafted email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Casual,
    Persuasive,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Formal => "formal",
            Tone::Casual => "casual",
            Tone::Persuasive => "persuasive",
        };
        write!(f, "{}", s)
    }
}

/// Which kind of text is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftKind {
    EmailDraft,
    DealAnalysis,
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DraftKind::EmailDraft => "email-draft",
            DraftKind::DealAnalysis => "deal-analysis",
        };
        write!(f, "{}", s)
    }
}

/// Payload for one assistant request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AssistantContext {
    /// Draft an email to a contact.
    #[serde(rename_all = "camelCase")]
    Contact {
        recipient_name: String,
        company: String,
        goal: String,
        tone: Tone,
    },
    /// Suggest how to move a deal forward.
    #[serde(rename_all = "camelCase")]
    Deal {
        deal_title: String,
        value: Money,
        stage: DealStage,
    },
}

impl AssistantContext {
    /// Email request for `contact`. A blank goal becomes [`DEFAULT_EMAIL_GOAL`].
    pub fn for_contact(contact: &Contact, goal: &str, tone: Tone) -> Self {
        let goal = if goal.trim().is_empty() {
            DEFAULT_EMAIL_GOAL.to_string()
        } else {
            goal.to_string()
        };
        AssistantContext::Contact {
            recipient_name: contact.name().to_string(),
            company: contact.company().to_string(),
            goal,
            tone,
        }
    }

    /// Analysis request for `deal`, captured as it is right now.
    pub fn for_deal(deal: &Deal) -> Self {
        AssistantContext::Deal {
            deal_title: deal.title().to_string(),
            value: deal.value(),
            stage: deal.stage(),
        }
    }

    pub fn kind(&self) -> DraftKind {
        match self {
            AssistantContext::Contact { .. } => DraftKind::EmailDraft,
            AssistantContext::Deal { .. } => DraftKind::DealAnalysis,
        }
    }
}
