//! Error Handling
//!
//! Unified error types for the platform core.
//! Uses thiserror for ergonomic error definitions.
//!
//! Every variant maps onto an HTTP-equivalent status so the surrounding
//! request layer can serialize failures without inspecting variants, and
//! carries a `retryable` classification for upstream generation failures.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// SQLite errors (auto-converted from rusqlite::Error)
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Configuration errors (bad schema table, bad white-label map)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed, too-short, or too-long input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing record, or an ownership mismatch reported identically so
    /// non-owners cannot confirm a record exists
    #[error("Not found: {0}")]
    NotFound(String),

    /// A phase-transition precondition was violated
    #[error("Invalid phase: operation requires phase '{required}' but strategy is in phase '{actual}'")]
    InvalidPhase { required: String, actual: String },

    /// The caller's role lacks the required capability
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The generation model returned output that could not be parsed
    #[error("Response parse error: {0}")]
    ResponseParse(String),

    /// Upstream generation call failed transiently; caller may retry
    #[error("Generation service unavailable: {0}")]
    UpstreamTransient(String),

    /// Upstream generation call failed fatally
    #[error("Generation failed: {0}")]
    UpstreamFatal(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid-phase error naming required vs actual phase
    pub fn invalid_phase(required: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::InvalidPhase {
            required: required.into(),
            actual: actual.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a response parse error
    pub fn response_parse(msg: impl Into<String>) -> Self {
        Self::ResponseParse(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP-equivalent status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::InvalidPhase { .. } => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::UpstreamTransient(_) => 503,
            _ => 500,
        }
    }

    /// Whether the caller may retry the operation as-is.
    ///
    /// The core never retries upstream calls itself; retry is a caller
    /// decision surfaced through this flag.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::UpstreamTransient(_))
    }
}

/// Convert AppError to a string suitable for boundary responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
