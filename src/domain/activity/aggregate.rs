//! Activity entity: an immutable record of an interaction.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ActivityId, DealId};

/// Kind of logged interaction. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Email,
    Call,
    Meeting,
    Note,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityKind::Email => "email",
            ActivityKind::Call => "call",
            ActivityKind::Meeting => "meeting",
            ActivityKind::Note => "note",
        };
        write!(f, "{}", s)
    }
}

/// A logged interaction, optionally tied to a deal by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    #[serde(rename = "type")]
    kind: ActivityKind,
    content: String,
    #[serde(rename = "date", with = "log_timestamp")]
    occurred_at: NaiveDateTime,
    #[serde(rename = "dealId", default, skip_serializing_if = "Option::is_none")]
    deal_id: Option<DealId>,
}

impl Activity {
    pub fn new(
        id: ActivityId,
        kind: ActivityKind,
        content: impl Into<String>,
        occurred_at: NaiveDateTime,
        deal_id: Option<DealId>,
    ) -> Self {
        Self {
            id,
            kind,
            content: content.into(),
            occurred_at,
            deal_id,
        }
    }

    pub fn id(&self) -> &ActivityId {
        &self.id
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn occurred_at(&self) -> NaiveDateTime {
        self.occurred_at
    }

    /// Lookup key for the related deal, if any (not ownership).
    pub fn deal_id(&self) -> Option<&DealId> {
        self.deal_id.as_ref()
    }
}

/// `2023-10-26 10:30 AM` timestamps as written in the activity log.
pub(crate) mod log_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %I:%M %p";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
