//! DraftAssistant - the collaborator boundary for generated text.
//!
//! `request_draft` always produces text. Provider errors, panics and empty
//! answers are all converted to the fixed fallback for the request kind and
//! logged; nothing propagates to the caller.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::assistant::{build_prompt, AssistantContext};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Generates email drafts and deal tips through an [`AIProvider`].
pub struct DraftAssistant {
    provider: Arc<dyn AIProvider>,
}

impl DraftAssistant {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self { provider }
    }

    /// Returns generated text for `context`, or the matching fallback.
    pub async fn request_draft(&self, context: &AssistantContext) -> String {
        let kind = context.kind();
        let metadata = RequestMetadata::new(kind);
        let trace_id = metadata.trace_id.clone();
        let request =
            CompletionRequest::new(metadata).with_message(MessageRole::User, build_prompt(context));

        debug!(%trace_id, %kind, provider = %self.provider.provider_info().name, "Requesting draft");

        let result = AssertUnwindSafe(self.provider.complete(request))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(response)) if response.content.trim().is_empty() => {
                warn!(%trace_id, %kind, finish_reason = ?response.finish_reason, "Provider returned no text");
                kind.empty_fallback().to_string()
            }
            Ok(Ok(response)) => {
                debug!(
                    %trace_id,
                    %kind,
                    model = %response.model,
                    tokens = response.usage.total_tokens,
                    "Draft generated"
                );
                response.content
            }
            Ok(Err(error)) => {
                warn!(%trace_id, %kind, %error, "Draft request failed");
                kind.failure_fallback().to_string()
            }
            Err(_) => {
                warn!(%trace_id, %kind, "Draft provider panicked");
                kind.failure_fallback().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::assistant::{
        Tone, ANALYSIS_EMPTY_FALLBACK, ANALYSIS_FAILURE_FALLBACK, EMAIL_EMPTY_FALLBACK,
        EMAIL_FAILURE_FALLBACK,
    };
    use crate::domain::deal::DealStage;
    use crate::domain::foundation::Money;
    use crate::ports::{AIError, CompletionResponse, ProviderInfo};
    use async_trait::async_trait;

    fn email() -> AssistantContext {
        AssistantContext::Contact {
            recipient_name: "Sarah Chen".to_string(),
            company: "TechFlow Inc.".to_string(),
            goal: "Follow up on the proposal".to_string(),
            tone: Tone::Casual,
        }
    }

    fn analysis() -> AssistantContext {
        AssistantContext::Deal {
            deal_title: "Global API Integration".to_string(),
            value: Money::new(150_000),
            stage: DealStage::Negotiation,
        }
    }

    fn assistant(provider: MockAIProvider) -> DraftAssistant {
        DraftAssistant::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn returns_generated_text() {
        let provider = MockAIProvider::new().with_response("Hi Sarah, quick follow-up...");
        let text = assistant(provider.clone()).request_draft(&email()).await;

        assert_eq!(text, "Hi Sarah, quick follow-up...");
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].messages[0].content.contains("Recipient: Sarah Chen"));
        assert!(calls[0].messages[0].content.contains("Tone: casual"));
    }

    #[tokio::test]
    async fn network_failure_yields_email_fallback() {
        let provider = MockAIProvider::new().with_error(MockError::Network {
            message: "connection reset".to_string(),
        });

        let text = assistant(provider).request_draft(&email()).await;

        assert_eq!(text, EMAIL_FAILURE_FALLBACK);
    }

    #[tokio::test]
    async fn failure_yields_analysis_fallback() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);

        let text = assistant(provider).request_draft(&analysis()).await;

        assert_eq!(text, ANALYSIS_FAILURE_FALLBACK);
    }

    #[tokio::test]
    async fn blank_text_yields_empty_fallbacks() {
        let provider = MockAIProvider::new().with_response("").with_response("   \n");
        let assistant = assistant(provider);

        assert_eq!(assistant.request_draft(&email()).await, EMAIL_EMPTY_FALLBACK);
        assert_eq!(assistant.request_draft(&analysis()).await, ANALYSIS_EMPTY_FALLBACK);
    }

    struct PanickingProvider;

    #[async_trait]
    impl AIProvider for PanickingProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, AIError> {
            panic!("provider bug");
        }

        fn provider_info(&self) -> ProviderInfo {
            ProviderInfo::new("panicking", "none")
        }
    }

    #[tokio::test]
    async fn provider_panic_yields_fallback() {
        let assistant = DraftAssistant::new(Arc::new(PanickingProvider));

        assert_eq!(assistant.request_draft(&analysis()).await, ANALYSIS_FAILURE_FALLBACK);
    }
}
