//! Generation Types
//!
//! Core types for the generation-call seam: request shape, provider
//! configuration, and the error taxonomy with its transient-vs-fatal
//! classification.

use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Configuration for a generation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Hard ceiling on a single generation call, in seconds. A call that
    /// exceeds it is a hard failure; there is no cancellation support.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// A single generation request: prompt in, text out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Optional system prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// The user prompt
    pub prompt: String,
    /// Optional temperature override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_override: Option<f32>,
}

impl GenerationRequest {
    /// Create a request with just a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature_override: None,
        }
    }

    /// Attach a system prompt
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Message markers that identify a transiently failing upstream
const TRANSIENT_MARKERS: &[&str] = &[
    "overloaded",
    "try again",
    "rate limit",
    "capacity",
    "temporarily unavailable",
];

/// Whether an upstream error message indicates a retryable condition
pub fn is_transient_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

/// Error types for generation calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationError {
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Provider reports overload; caller may retry
    Overloaded { message: String },
    /// Rate limit exceeded; caller may retry
    RateLimited { message: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError { message: String, status: Option<u16> },
    /// Network/connection error
    NetworkError { message: String },
    /// Provider returned no usable text
    EmptyResponse,
    /// Other error
    Other { message: String },
}

impl GenerationError {
    /// Transient-vs-fatal classification.
    ///
    /// Overload and rate-limit responses are transient by construction;
    /// anything else is transient only when its message carries a known
    /// "overloaded"/"try again" marker.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Overloaded { .. } | Self::RateLimited { .. } => true,
            Self::AuthenticationFailed { message }
            | Self::InvalidRequest { message }
            | Self::ServerError { message, .. }
            | Self::NetworkError { message }
            | Self::Other { message } => is_transient_message(message),
            Self::EmptyResponse => false,
        }
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            Self::Overloaded { message } => write!(f, "Provider overloaded: {}", message),
            Self::RateLimited { message } => write!(f, "Rate limited: {}", message),
            Self::InvalidRequest { message } => write!(f, "Invalid request: {}", message),
            Self::ServerError { message, status } => match status {
                Some(s) => write!(f, "Server error ({}): {}", s, message),
                None => write!(f, "Server error: {}", message),
            },
            Self::NetworkError { message } => write!(f, "Network error: {}", message),
            Self::EmptyResponse => write!(f, "Provider returned an empty response"),
            Self::Other { message } => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Result type for generation calls
pub type GenerationResult<T> = Result<T, GenerationError>;

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        if err.is_transient() {
            AppError::UpstreamTransient(err.to_string())
        } else {
            AppError::UpstreamFatal(err.to_string())
        }
    }
}
