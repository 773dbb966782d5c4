//! Gemini Provider - Implementation of AIProvider for Google's Generative Language API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-3-flash-preview")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let provider = GeminiProvider::new(config)?;
//! ```
//!
//! An empty API key is accepted at construction. Every call then fails with
//! `AuthenticationFailed` without touching the network, and the assistant
//! shows its fallback text.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ProviderInfo, TokenUsage,
};

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

/// Upper bound on retries; larger values are clamped.
pub const MAX_GEMINI_RETRIES: u32 = 10;

/// Public endpoint of the Generative Language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry.
    pub retry_base_delay: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
            retry_base_delay: Duration::from_secs(1),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count, clamped to [`MAX_GEMINI_RETRIES`].
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.min(MAX_GEMINI_RETRIES);
        self
    }

    /// Sets the first backoff delay.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Returns true if an API key was supplied.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().trim().is_empty()
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| Content {
                role: Some(
                    match msg.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part {
                    text: Some(msg.content.clone()),
                }],
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|prompt| Content {
            role: None,
            parts: vec![Part {
                text: Some(prompt.clone()),
            }],
        });

        let generation_config = request.max_tokens.map(|max| GenerationConfig {
            max_output_tokens: Some(max),
        });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = Self::to_gemini_request(request);

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            // Gemini reports a bad key as INVALID_ARGUMENT
            400 if error_body.contains("API key not valid") || error_body.contains("API_KEY_INVALID") => {
                Err(AIError::AuthenticationFailed)
            }
            400 => Err(AIError::InvalidRequest(error_body)),
            429 => Err(AIError::rate_limited(parse_retry_after(&error_body))),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses a generateContent response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = Self::handle_response_status(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        Ok(self.to_completion(body))
    }

    fn to_completion(&self, body: GenerateContentResponse) -> CompletionResponse {
        let usage = body
            .usage_metadata
            .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();
        let model = body.model_version.unwrap_or_else(|| self.config.model.clone());

        let blocked = body
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .is_some();

        let Some(candidate) = body.candidates.into_iter().next() else {
            return CompletionResponse {
                content: String::new(),
                usage,
                model,
                finish_reason: if blocked {
                    FinishReason::ContentFilter
                } else {
                    FinishReason::Other
                },
            };
        };

        let content = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        let finish_reason = match candidate.finish_reason.as_deref() {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::ContentFilter
            }
            Some(_) => FinishReason::Other,
        };

        CompletionResponse {
            content,
            usage,
            model,
            finish_reason,
        }
    }
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if !self.config.has_api_key() {
            debug!(trace_id = %request.metadata.trace_id, "No Gemini API key configured");
            return Err(AIError::AuthenticationFailed);
        }

        let mut retry_count = 0;

        loop {
            debug!(
                trace_id = %request.metadata.trace_id,
                kind = %request.metadata.kind,
                model = %self.config.model,
                attempt = retry_count + 1,
                "Sending Gemini request"
            );

            let result = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(completion) => return Ok(completion),
                Err(err) if !err.is_retryable() || retry_count >= self.config.max_retries => {
                    return Err(err);
                }
                Err(err) => {
                    let delay = backoff_delay(self.config.retry_base_delay, retry_count);
                    warn!(
                        trace_id = %request.metadata.trace_id,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying Gemini request"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gemini", &self.config.model)
    }
}

/// Delay before retry number `retry_count + 1`: `base * 2^retry_count`, saturating.
fn backoff_delay(base: Duration, retry_count: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(retry_count))
}

/// Extracts `retryDelay` ("17s") from a RESOURCE_EXHAUSTED error body.
fn parse_retry_after(error_body: &str) -> u32 {
    const DEFAULT_RETRY_SECS: u32 = 30;

    let Ok(parsed) = serde_json::from_str::<serde_json::Value>(error_body) else {
        return DEFAULT_RETRY_SECS;
    };

    parsed
        .pointer("/error/details")
        .and_then(|d| d.as_array())
        .into_iter()
        .flatten()
        .filter_map(|detail| detail.get("retryDelay").and_then(|v| v.as_str()))
        .find_map(|delay| delay.trim_end_matches('s').parse::<f64>().ok())
        .map(|secs| secs.ceil() as u32)
        .unwrap_or(DEFAULT_RETRY_SECS)
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assistant::DraftKind;
    use crate::ports::RequestMetadata;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str = "/models/gemini-3-flash-preview:generateContent";

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(DraftKind::DealAnalysis))
            .with_message(MessageRole::User, "Analyze this deal")
    }

    fn provider(server: &MockServer, key: &str) -> GeminiProvider {
        GeminiProvider::new(
            GeminiConfig::new(key)
                .with_base_url(server.uri())
                .with_max_retries(1)
                .with_retry_base_delay(Duration::from_millis(10)),
        )
        .unwrap()
    }

    fn success_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20 },
            "modelVersion": "gemini-3-flash-preview"
        })
    }

    #[tokio::test]
    async fn sends_prompt_and_parses_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Analyze this deal" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("Schedule a pricing call.")))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server, "test-key").complete(request()).await.unwrap();

        assert_eq!(response.content, "Schedule a pricing call.");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.total_tokens, 20);
    }

    #[tokio::test]
    async fn joins_multiple_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Hi " }, { "text": "there" }] },
                    "finishReason": "MAX_TOKENS"
                }]
            })))
            .mount(&server)
            .await;

        let response = provider(&server, "k").complete(request()).await.unwrap();

        assert_eq!(response.content, "Hi there");
        assert_eq!(response.finish_reason, FinishReason::Length);
    }

    #[tokio::test]
    async fn blocked_prompt_yields_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let response = provider(&server, "k").complete(request()).await.unwrap();

        assert!(response.content.is_empty());
        assert_eq!(response.finish_reason, FinishReason::ContentFilter);
    }

    #[tokio::test]
    async fn empty_key_fails_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server, "").complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn invalid_key_maps_to_authentication_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = provider(&server, "bad").complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_surface() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(2)
            .mount(&server)
            .await;

        let err = provider(&server, "k").complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn rate_limit_reads_retry_delay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": {
                    "code": 429,
                    "status": "RESOURCE_EXHAUSTED",
                    "details": [{ "@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "17s" }]
                }
            })))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            GeminiConfig::new("k").with_base_url(server.uri()).with_max_retries(0),
        )
        .unwrap();
        let err = provider.complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 17 }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider(&server, "k").complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::Parse(_)));
    }

    #[test]
    fn request_carries_system_prompt_and_generation_config() {
        let req = request().with_system_prompt("Be brief").with_max_tokens(256);
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&req)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(body["generationConfig"].as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn max_retries_is_clamped() {
        let config = GeminiConfig::new("k").with_max_retries(40);
        assert_eq!(config.max_retries, MAX_GEMINI_RETRIES);
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(800));
        assert_eq!(backoff_delay(base, 40), base.saturating_mul(u32::MAX));
        assert_eq!(backoff_delay(Duration::from_secs(u64::MAX), 2), Duration::MAX);
    }

    #[tokio::test]
    async fn large_retry_setting_keeps_retrying_without_overflow() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(u64::from(MAX_GEMINI_RETRIES) + 1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new(
            GeminiConfig::new("k")
                .with_base_url(server.uri())
                .with_max_retries(40)
                .with_retry_base_delay(Duration::from_nanos(1)),
        )
        .unwrap();
        let err = provider.complete(request()).await.unwrap_err();

        assert!(matches!(err, AIError::Unavailable { .. }));
    }

    #[test]
    fn retry_after_defaults_when_unparseable() {
        assert_eq!(parse_retry_after("nope"), 30);
        assert_eq!(parse_retry_after(r#"{"error":{"details":[]}}"#), 30);
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = GeminiProvider::new(GeminiConfig::new("k").with_model("gemini-pro")).unwrap();
        assert_eq!(provider.provider_info(), ProviderInfo::new("gemini", "gemini-pro"));
    }
}
