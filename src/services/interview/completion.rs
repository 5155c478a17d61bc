//! Variable Completion
//!
//! Computes the filled/empty split over the interview schema and merges
//! AI-suggested values without ever overwriting user-entered ones. The
//! split here is the single source of truth for completion, used both for
//! display and for AI-fill targeting.

use std::collections::{BTreeMap, HashSet};

use crate::models::strategy::InterviewData;

use super::schema::{InterviewSchema, InterviewVariable};

/// Result of partitioning the schema by completion state
#[derive(Debug, Clone)]
pub struct CompletionSplit<'a> {
    /// Variables with no value, or only whitespace
    pub empty: Vec<&'a InterviewVariable>,
    /// Variables holding a non-empty trimmed value
    pub filled: Vec<&'a InterviewVariable>,
}

impl CompletionSplit<'_> {
    /// Ids of the empty variables
    pub fn empty_ids(&self) -> HashSet<String> {
        self.empty.iter().map(|v| v.id.clone()).collect()
    }
}

/// Partition every schema variable into exactly one of {empty, filled}.
///
/// A variable is filled iff the data holds a non-empty-after-trim value
/// for its id. Keys in the data that are not in the schema are ignored.
pub fn split_by_completion<'a>(
    schema: &'a InterviewSchema,
    data: &InterviewData,
) -> CompletionSplit<'a> {
    let mut empty = Vec::new();
    let mut filled = Vec::new();
    for variable in schema.variables() {
        if data.is_filled(&variable.id) {
            filled.push(variable);
        } else {
            empty.push(variable);
        }
    }
    CompletionSplit { empty, filled }
}

/// Outcome of merging generated values into existing interview data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing data plus the accepted generated values
    pub merged: InterviewData,
    /// Ids whose values were accepted, in schema-independent sorted order
    pub auto_filled_ids: Vec<String>,
}

/// Merge generated values into the interview data without overwriting.
///
/// A generated entry is accepted only when its key is in `empty_ids` AND
/// its value is a non-empty-after-trim string. Everything else — keys
/// already filled, keys outside the empty set, blank values, non-string
/// values — is silently dropped. Pure and total: malformed entries are
/// skipped, never fatal.
pub fn merge_generated(
    data: &InterviewData,
    generated: &serde_json::Map<String, serde_json::Value>,
    empty_ids: &HashSet<String>,
) -> MergeOutcome {
    let mut merged: BTreeMap<String, String> = data.clone().into_inner();
    let mut auto_filled_ids = Vec::new();

    for (key, value) in generated {
        if !empty_ids.contains(key) {
            continue;
        }
        let Some(text) = value.as_str() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        merged.insert(key.clone(), text.to_string());
        auto_filled_ids.push(key.clone());
    }

    auto_filled_ids.sort();

    MergeOutcome {
        merged: merged.into(),
        auto_filled_ids,
    }
}
