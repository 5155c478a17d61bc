//! HTTP Generation Provider
//!
//! Concrete provider against an OpenAI-compatible chat-completions
//! endpoint. The HTTP layer owns the timeout ceiling and maps transport
//! and status failures into the classified error taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{missing_api_key_error, parse_http_error, GenerationProvider};
use super::types::{GenerationError, GenerationRequest, GenerationResult, ProviderConfig};

/// Default chat-completions endpoint
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Generation provider speaking the chat-completions protocol
pub struct HttpGenerationProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl HttpGenerationProvider {
    /// Create a provider with the given configuration
    pub fn new(config: ProviderConfig) -> GenerationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Other {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": request.prompt }));

        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": request.temperature_override.unwrap_or(self.config.temperature),
            "messages": messages,
        })
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerationProvider {
    fn name(&self) -> &'static str {
        "http"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        let body = self.build_request_body(&request);

        debug!(
            model = %self.config.model,
            prompt_chars = request.prompt.len(),
            "sending generation request"
        );

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    // Exceeding the platform ceiling is a hard failure;
                    // there is no cancellation or automatic retry.
                    GenerationError::Other {
                        message: format!(
                            "generation call exceeded the {}s ceiling",
                            self.config.timeout_secs
                        ),
                    }
                } else {
                    GenerationError::NetworkError {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| GenerationError::NetworkError {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &text, self.name()));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Other {
                message: format!("malformed provider response: {}", e),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}
