//! Drafting assistant vocabulary.
//!
//! The request payload is a tagged variant over the two things the assistant
//! can be asked about: a contact (email draft) or a deal (stage analysis).
//! Provider access lives behind the `AIProvider` port; this module only
//! decides what to ask and what to show when asking fails.

mod context;
mod prompts;

pub use context::{AssistantContext, DraftKind, Tone, DEFAULT_EMAIL_GOAL};
pub use prompts::{
    build_prompt, ANALYSIS_EMPTY_FALLBACK, ANALYSIS_FAILURE_FALLBACK, EMAIL_EMPTY_FALLBACK,
    EMAIL_FAILURE_FALLBACK,
};
