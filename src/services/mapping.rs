//! Free-Text Mapping
//!
//! Maps a pasted brand document onto the interview variable space. Input
//! passes a minimum-substance gate before any model call; oversized input
//! is silently truncated to the processing cap. The mapped result is a
//! preview the caller can apply or discard, nothing is persisted here.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::services::interview::schema::InterviewSchema;
use crate::services::llm::extraction::extract_variable_map;
use crate::services::llm::provider::GenerationProvider;
use crate::services::llm::types::GenerationRequest;
use crate::utils::error::{AppError, AppResult};

/// Minimum characters of free text worth mapping
pub const MIN_TEXT_CHARS: usize = 100;

/// Minimum words of free text worth mapping
pub const MIN_TEXT_WORDS: usize = 50;

/// Processing cap; text beyond this is silently dropped
pub const MAX_TEXT_CHARS: usize = 50_000;

const SYSTEM_PROMPT: &str = "You are a senior brand strategist. You extract \
marketing interview answers from brand documents. You answer with a single \
JSON object and nothing else.";

/// Input for a free-text mapping run. Brand name and sector are optional
/// hints that anchor the extraction; the document text carries the gate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapTextRequest {
    pub text: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl MapTextRequest {
    /// Request with just the document text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Result of mapping free text onto the variable space
#[derive(Debug, Clone, Serialize)]
pub struct MappedVariables {
    /// Variable id to extracted value
    pub mapped_variables: BTreeMap<String, String>,
    /// Share of schema variables mapped, rounded to two decimals
    pub confidence: f64,
    /// Schema ids the text gave no answer for
    pub unmapped_variables: Vec<String>,
}

/// Maps free-form brand text to interview variables
pub struct MappingService {
    provider: Arc<dyn GenerationProvider>,
}

impl MappingService {
    /// Create a service over the given provider
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Self {
        Self { provider }
    }

    /// Map free text onto the schema's variable ids.
    ///
    /// Text below the substance gate is rejected before any model call.
    /// Values for ids outside the schema, or blank values, are dropped
    /// from the result.
    pub async fn map_free_text(
        &self,
        schema: &InterviewSchema,
        request: &MapTextRequest,
    ) -> AppResult<MappedVariables> {
        let text = validate_and_cap(&request.text)?;

        debug!(
            chars = text.chars().count(),
            provider = self.provider.name(),
            "mapping free text to interview variables"
        );

        let generation = build_mapping_request(schema, &text, request);
        let raw = self
            .provider
            .generate(generation)
            .await
            .map_err(AppError::from)?;
        let extracted = extract_variable_map(&raw)?;

        let mut mapped_variables = BTreeMap::new();
        for (key, value) in &extracted {
            if schema.get(key).is_none() {
                continue;
            }
            let Some(text) = value.as_str() else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }
            mapped_variables.insert(key.clone(), text.to_string());
        }

        let unmapped_variables: Vec<String> = schema
            .variable_ids()
            .into_iter()
            .filter(|id| !mapped_variables.contains_key(*id))
            .map(String::from)
            .collect();

        let confidence = if schema.is_empty() {
            0.0
        } else {
            round2(mapped_variables.len() as f64 / schema.len() as f64)
        };

        info!(
            mapped = mapped_variables.len(),
            total = schema.len(),
            confidence,
            "free-text mapping finished"
        );

        Ok(MappedVariables {
            mapped_variables,
            confidence,
            unmapped_variables,
        })
    }
}

/// Apply the substance gate and the processing cap.
///
/// Rejection is explicit; truncation is silent. Text of exactly the cap
/// length passes through unchanged.
fn validate_and_cap(text: &str) -> AppResult<String> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    let words = trimmed.split_whitespace().count();

    if chars < MIN_TEXT_CHARS || words < MIN_TEXT_WORDS {
        return Err(AppError::validation(format!(
            "text too short to map: need at least {} characters and {} words, got {} characters and {} words",
            MIN_TEXT_CHARS, MIN_TEXT_WORDS, chars, words
        )));
    }

    if chars > MAX_TEXT_CHARS {
        debug!(chars, cap = MAX_TEXT_CHARS, "truncating oversized text");
        Ok(trimmed.chars().take(MAX_TEXT_CHARS).collect())
    } else {
        Ok(trimmed.to_string())
    }
}

fn build_mapping_request(
    schema: &InterviewSchema,
    text: &str,
    request: &MapTextRequest,
) -> GenerationRequest {
    let mut prompt = String::new();
    if let Some(brand_name) = &request.brand_name {
        prompt.push_str(&format!("Brand: {}\n", brand_name));
    }
    if let Some(sector) = &request.sector {
        prompt.push_str(&format!("Sector: {}\n", sector));
    }
    if !prompt.is_empty() {
        prompt.push('\n');
    }

    prompt.push_str("# Interview variables\n");
    for variable in schema.variables() {
        prompt.push_str(&format!(
            "- {}: {} — {}\n",
            variable.id, variable.label, variable.description
        ));
    }

    prompt.push_str("\n# Document\n");
    prompt.push_str(text);
    prompt.push_str(
        "\n\nExtract an answer for every variable the document actually \
         covers. Respond with exactly one JSON object mapping variable ids \
         to concise answer strings. Omit variables the document does not \
         cover. No markdown, no commentary.",
    );

    GenerationRequest::new(prompt).with_system(SYSTEM_PROMPT)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
