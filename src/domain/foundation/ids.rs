//! Strongly-typed identifier value objects.
//!
//! Identifiers are opaque strings. Uniqueness within a collection is the
//! responsibility of whoever creates the entity; nothing here checks it.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning error if empty.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Unique identifier for a contact.
    ContactId,
    "contact_id"
);

string_id!(
    /// Unique identifier for a deal.
    DealId,
    "deal_id"
);

string_id!(
    /// Unique identifier for a logged activity.
    ActivityId,
    "activity_id"
);

static LAST_CONTACT_TOKEN: AtomicU64 = AtomicU64::new(0);

impl ContactId {
    /// Generates a fresh id from the wall clock in milliseconds.
    ///
    /// Two calls within the same millisecond still yield distinct,
    /// increasing tokens.
    pub fn generate() -> Self {
        Self(next_token().to_string())
    }
}

fn next_token() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut last = LAST_CONTACT_TOKEN.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_CONTACT_TOKEN.compare_exchange_weak(
            last,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
