//! Interview Variable Schema
//!
//! The fixed set of named interview variables, grouped into pillar
//! sections. Schema-defined, not persisted per instance: a strategy's
//! `interview_data` is a sparse mapping over this id space. Immutable
//! configuration loaded once at startup and injected by reference.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::pillar::PillarType;
use crate::utils::error::{AppError, AppResult};

/// A schema-defined interview variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewVariable {
    /// Unique id, prefixed by its pillar code (e.g. "A1", "D3")
    pub id: String,
    /// Display label
    pub label: String,
    /// What the variable captures
    pub description: String,
    /// Example placeholder shown in the form
    pub example: String,
}

/// A pillar section grouping interview variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarSection {
    /// The pillar this section belongs to
    pub pillar: PillarType,
    /// Section title
    pub title: String,
    /// Variables in display order
    pub variables: Vec<InterviewVariable>,
}

/// The full interview schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSchema {
    /// Config format version
    #[serde(default = "default_version")]
    pub version: String,
    /// Sections in pillar order
    pub sections: Vec<PillarSection>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for InterviewSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSchema {
    /// Built-in default schema for the A-D-V-E methodology
    pub fn new() -> Self {
        let sections = vec![
            PillarSection {
                pillar: PillarType::Audience,
                title: "Audience".to_string(),
                variables: vec![
                    var("A1", "Ideal customer", "Who the brand primarily serves",
                        "e.g. independent retailers with 5-50 employees"),
                    var("A2", "Customer pain", "The main problem the audience struggles with",
                        "e.g. no time to produce consistent marketing"),
                    var("A3", "Buying trigger", "What pushes the audience to act",
                        "e.g. a failed campaign or a new competitor"),
                ],
            },
            PillarSection {
                pillar: PillarType::Distinction,
                title: "Distinction".to_string(),
                variables: vec![
                    var("D1", "Positioning", "One sentence stating what makes the brand different",
                        "e.g. the only agency pricing by outcome, not hours"),
                    var("D2", "Proof points", "Evidence backing the positioning",
                        "e.g. 40 retained clients, 92% renewal rate"),
                    var("D3", "Main competitor", "Who the brand is most often compared with",
                        "e.g. the large network agencies"),
                ],
            },
            PillarSection {
                pillar: PillarType::Voice,
                title: "Voice".to_string(),
                variables: vec![
                    var("V1", "Tone", "How the brand sounds",
                        "e.g. direct, warm, no jargon"),
                    var("V2", "Key message", "The one idea every piece of content repeats",
                        "e.g. marketing should pay for itself"),
                ],
            },
            PillarSection {
                pillar: PillarType::Experience,
                title: "Experience".to_string(),
                variables: vec![
                    var("E1", "Signature moment", "The interaction customers remember",
                        "e.g. the monthly strategy call with live numbers"),
                    var("E2", "Service promise", "What the brand commits to on every engagement",
                        "e.g. a reply within one business day"),
                ],
            },
        ];

        Self {
            version: default_version(),
            sections,
        }
    }

    /// Load from a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema: InterviewSchema = serde_json::from_str(&content)?;
        if schema.sections.is_empty() {
            return Err(AppError::config("interview schema has no sections"));
        }
        Ok(schema)
    }

    /// Load from `interview_schema.json` under the config root, or use the
    /// built-in default
    pub fn load_or_default(config_root: impl AsRef<Path>) -> Self {
        let path = config_root.as_ref().join("interview_schema.json");
        if path.exists() {
            Self::from_file(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Iterate over all variables across sections, in schema order
    pub fn variables(&self) -> impl Iterator<Item = &InterviewVariable> {
        self.sections.iter().flat_map(|s| s.variables.iter())
    }

    /// All variable ids, in schema order
    pub fn variable_ids(&self) -> Vec<&str> {
        self.variables().map(|v| v.id.as_str()).collect()
    }

    /// Look up a variable by id
    pub fn get(&self, id: &str) -> Option<&InterviewVariable> {
        self.variables().find(|v| v.id == id)
    }

    /// Total number of schema variables
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.variables.len()).sum()
    }

    /// Whether the schema has no variables
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn var(id: &str, label: &str, description: &str, example: &str) -> InterviewVariable {
    InterviewVariable {
        id: id.to_string(),
        label: label.to_string(),
        description: description.to_string(),
        example: example.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_covers_all_pillars() {
        let schema = InterviewSchema::default();
        let pillars: Vec<PillarType> = schema.sections.iter().map(|s| s.pillar).collect();
        assert_eq!(pillars, PillarType::all().to_vec());
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_variable_ids_carry_pillar_prefix() {
        let schema = InterviewSchema::default();
        for section in &schema.sections {
            for variable in &section.variables {
                assert!(
                    variable.id.starts_with(section.pillar.code()),
                    "{} should start with {}",
                    variable.id,
                    section.pillar.code()
                );
            }
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let schema = InterviewSchema::default();
        assert_eq!(schema.get("A1").unwrap().label, "Ideal customer");
        assert!(schema.get("Z9").is_none());
    }

    #[test]
    fn test_file_roundtrip() {
        let schema = InterviewSchema::default();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview_schema.json");
        std::fs::write(&path, serde_json::to_string_pretty(&schema).unwrap()).unwrap();

        let loaded = InterviewSchema::from_file(&path).unwrap();
        assert_eq!(loaded.len(), schema.len());
        assert_eq!(loaded.variable_ids(), schema.variable_ids());

        let from_root = InterviewSchema::load_or_default(dir.path());
        assert_eq!(from_root.len(), schema.len());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let schema = InterviewSchema::load_or_default("/nonexistent/path");
        assert_eq!(schema.len(), InterviewSchema::default().len());
    }
}
