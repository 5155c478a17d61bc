//! Response Types
//!
//! Standard response envelope for the request boundary. Errors carry an
//! HTTP-equivalent status and a retryable flag so the surrounding
//! transport layer can serialize them without inspecting error variants.

use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Error body returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// HTTP-equivalent status code
    pub status: u16,
    /// Whether the caller may retry the request as-is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let retryable = if err.retryable() { Some(true) } else { None };
        Self {
            status: err.status_code(),
            retryable,
            error: err.to_string(),
        }
    }
}

/// Generic response envelope for all boundary operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response
    pub fn err(err: impl Into<ApiError>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.into()),
        }
    }
}

impl<T> From<Result<T, AppError>> for ApiResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e),
        }
    }
}
