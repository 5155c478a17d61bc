//! Response Extraction
//!
//! Parses model output back into typed key/value data: strips a single
//! fenced code block if present, then requires a strict JSON object. A
//! parse failure is fatal and never retried by the core; the offending
//! payload is logged truncated, never echoed back to the caller.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::utils::error::{AppError, AppResult};

/// Max characters of raw model output kept in diagnostic logs
const LOG_SNIPPET_CHARS: usize = 500;

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // One fenced block, optional language tag after the opening fence.
    RE.get_or_init(|| Regex::new(r"(?s)```[a-zA-Z0-9_-]*\s*\n?(.*?)```").expect("valid regex"))
}

/// Strip a single markdown code fence if the response carries one,
/// otherwise return the trimmed input unchanged.
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(caps) = fence_regex().captures(trimmed) {
        if let Some(inner) = caps.get(1) {
            return inner.as_str().trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Parse model output into a JSON object of variable values.
///
/// Strict: after fence stripping the payload must parse as a JSON object.
/// Anything else fails with a response-parse error and logs a truncated
/// snapshot for diagnosis.
pub fn extract_variable_map(text: &str) -> AppResult<serde_json::Map<String, serde_json::Value>> {
    let payload = strip_code_fence(text);

    let value: serde_json::Value = match serde_json::from_str(&payload) {
        Ok(v) => v,
        Err(e) => {
            warn!(
                error = %e,
                payload = %truncate_for_log(&payload),
                "model response failed strict JSON parse"
            );
            return Err(AppError::response_parse(format!(
                "model response is not valid JSON: {}",
                e
            )));
        }
    };

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => {
            warn!(
                payload = %truncate_for_log(&payload),
                "model response parsed but is not a JSON object"
            );
            Err(AppError::response_parse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn truncate_for_log(s: &str) -> String {
    if s.chars().count() <= LOG_SNIPPET_CHARS {
        s.to_string()
    } else {
        let snippet: String = s.chars().take(LOG_SNIPPET_CHARS).collect();
        format!("{}…", snippet)
    }
}
