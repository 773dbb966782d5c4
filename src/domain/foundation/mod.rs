//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the CRM domain.

mod errors;
mod ids;
mod money;
mod probability;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{ActivityId, ContactId, DealId};
pub use money::Money;
pub use probability::Probability;
pub use state_machine::StateMachine;
