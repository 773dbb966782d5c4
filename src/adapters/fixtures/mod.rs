//! Static seed data.
//!
//! The session starts from a fixed set of contacts, deals and activities
//! embedded at compile time. The data is parsed once per session; nothing is
//! ever written back.

use serde::Deserialize;
use thiserror::Error;

use crate::domain::activity::Activity;
use crate::domain::contact::Contact;
use crate::domain::deal::Deal;

const SEED_JSON: &str = include_str!("seed.json");

/// Failure to parse seed data.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("seed data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The three seeded collections, in fixture order.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub contacts: Vec<Contact>,
    pub deals: Vec<Deal>,
    pub activities: Vec<Activity>,
}

impl SeedData {
    /// Parses the embedded fixture set.
    pub fn load() -> Result<Self, FixtureError> {
        Self::from_json(SEED_JSON)
    }

    /// Parses seed data from a JSON document of the same shape.
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }
}
