//! Contact entity.
//!
//! Contacts are created by the add-contact action (or seeded from fixtures),
//! never modified afterwards, and destroyed by an explicit delete. Deals
//! point at contacts by id only; deleting a contact does not touch them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ContactId, ValidationError};

/// A person the sales team works with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    id: ContactId,
    name: String,
    email: String,
    phone: String,
    company: String,
    role: String,
    /// Avatar image URI.
    avatar: String,
    last_contacted: LastContacted,
}

impl Contact {
    /// Builds a contact from already-validated parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ContactId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
        role: impl Into<String>,
        avatar: impl Into<String>,
        last_contacted: LastContacted,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company: company.into(),
            role: role.into(),
            avatar: avatar.into(),
            last_contacted,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ContactId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn last_contacted(&self) -> &LastContacted {
        &self.last_contacted
    }
}

/// When the contact was last reached, or the `Never` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LastContacted {
    Never,
    On(NaiveDate),
}

const NEVER: &str = "Never";

impl LastContacted {
    /// Returns the date, if the contact has been reached at all.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            LastContacted::Never => None,
            LastContacted::On(date) => Some(*date),
        }
    }
}

impl TryFrom<String> for LastContacted {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == NEVER {
            return Ok(LastContacted::Never);
        }
        NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(LastContacted::On)
            .map_err(|e| ValidationError::invalid_format("last_contacted", e.to_string()))
    }
}

impl From<LastContacted> for String {
    fn from(value: LastContacted) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LastContacted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastContacted::Never => write!(f, "{}", NEVER),
            LastContacted::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}
