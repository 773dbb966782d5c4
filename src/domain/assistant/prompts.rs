//! Prompt text and fallback strings for the drafting assistant.

use super::{AssistantContext, DraftKind};

/// Returned when an email draft request fails outright.
pub const EMAIL_FAILURE_FALLBACK: &str =
    "Error generating content. Please check your API key configuration.";

/// Returned when the provider answers an email request with no text.
pub const EMAIL_EMPTY_FALLBACK: &str = "I couldn't generate the email at this time.";

/// Returned when a deal analysis request fails outright.
pub const ANALYSIS_FAILURE_FALLBACK: &str = "Analysis unavailable.";

/// Returned when the provider answers an analysis request with no text.
pub const ANALYSIS_EMPTY_FALLBACK: &str = "No analysis available.";

impl DraftKind {
    /// Text shown when the request could not be completed.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            DraftKind::EmailDraft => EMAIL_FAILURE_FALLBACK,
            DraftKind::DealAnalysis => ANALYSIS_FAILURE_FALLBACK,
        }
    }

    /// Text shown when the provider returned nothing usable.
    pub fn empty_fallback(&self) -> &'static str {
        match self {
            DraftKind::EmailDraft => EMAIL_EMPTY_FALLBACK,
            DraftKind::DealAnalysis => ANALYSIS_EMPTY_FALLBACK,
        }
    }
}

/// Builds the user prompt for a request.
pub fn build_prompt(context: &AssistantContext) -> String {
    match context {
        AssistantContext::Contact {
            recipient_name,
            company,
            goal,
            tone,
        } => format!(
            "You are an expert sales assistant. Write a cold email or follow-up email.\n\
             \n\
             Recipient: {recipient_name}\n\
             Company: {company}\n\
             Context/Goal: {goal}\n\
             Tone: {tone}\n\
             \n\
             Keep it concise (under 150 words). Include a clear call to action.\n\
             Return only the email body text."
        ),
        AssistantContext::Deal {
            deal_title,
            value,
            stage,
        } => format!(
            "Analyze this sales deal and provide a brief strategic tip (1-2 sentences) \
             on how to move it to the next stage.\n\
             \n\
             Deal: {deal_title}\n\
             Value: ${amount}\n\
             Current Stage: {stage}",
            amount = value.amount()
        ),
    }
}
