//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative-text providers (Gemini, mock)
//! - `fixtures` - Embedded seed data

pub mod ai;
pub mod fixtures;

pub use ai::{GeminiConfig, GeminiProvider, MockAIProvider, MockError, MockResponse};
pub use fixtures::{FixtureError, SeedData};
