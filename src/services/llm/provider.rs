//! Generation Provider Trait
//!
//! The narrow seam the rest of the core talks through: prompt in, text
//! out, classified error out. Concrete model providers are swappable
//! without touching merge or state-machine logic.

use async_trait::async_trait;

use super::types::{GenerationError, GenerationRequest, GenerationResult};

/// Trait all generation providers implement
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name for identification
    fn name(&self) -> &'static str;

    /// The model being used
    fn model(&self) -> &str;

    /// Send a prompt and await the complete text response.
    ///
    /// Awaited synchronously per request; the configured ceiling bounds
    /// the wait and an exceeded ceiling is a hard failure.
    async fn generate(&self, request: GenerationRequest) -> GenerationResult<String>;
}

/// Error for a provider configured without an API key
pub fn missing_api_key_error(provider: &str) -> GenerationError {
    GenerationError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Map an HTTP error status from the provider to a classified error
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> GenerationError {
    match status {
        401 | 403 => GenerationError::AuthenticationFailed {
            message: format!("{}: access denied", provider),
        },
        429 => GenerationError::RateLimited {
            message: body.to_string(),
        },
        400 => GenerationError::InvalidRequest {
            message: body.to_string(),
        },
        503 | 529 => GenerationError::Overloaded {
            message: body.to_string(),
        },
        500..=599 => GenerationError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => GenerationError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
