//! White-Label Transposition
//!
//! Maps internal methodology terminology to client-facing vocabulary based
//! on the requesting role. Internal roles (admin/operator) always see
//! internal labels; external roles see the mapped value, or the original
//! when no mapping exists. Pass-through on unmapped input is the intended
//! fallback, never an error.
//!
//! The mapping table is immutable configuration loaded once at startup and
//! injected by reference. `verify()` rejects tables whose outputs are also
//! keys, which makes `transform` idempotent for every table that loads.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::pillar::Pillar;
use crate::services::role::Role;
use crate::utils::error::{AppError, AppResult};

/// White-label map configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct WhiteLabelFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    labels: HashMap<String, String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Immutable internal-label to external-label mapping
#[derive(Debug, Clone)]
pub struct WhiteLabelMap {
    entries: HashMap<String, String>,
}

impl Default for WhiteLabelMap {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiteLabelMap {
    /// Built-in default vocabulary
    pub fn new() -> Self {
        let entries = [
            ("Audit T", "Brand Audit"),
            ("Fiche", "Brand Profile"),
            ("Cockpit", "Strategy Dashboard"),
            ("Pilier Audience", "Audience Pillar"),
            ("Pilier Distinction", "Positioning Pillar"),
            ("Pilier Voice", "Brand Voice Pillar"),
            ("Pilier Experience", "Customer Experience Pillar"),
            ("Signal", "Market Insight"),
            ("Transposition", "Content Plan"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { entries }
    }

    /// Build from an explicit table, enforcing the idempotence invariant
    pub fn from_entries(entries: HashMap<String, String>) -> AppResult<Self> {
        let map = Self { entries };
        map.verify()?;
        Ok(map)
    }

    /// Load from a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: WhiteLabelFile = serde_json::from_str(&content)?;
        Self::from_entries(file.labels)
    }

    /// Load from `white_label.json` under the config root, or use the
    /// built-in default table
    pub fn load_or_default(config_root: impl AsRef<Path>) -> Self {
        let path = config_root.as_ref().join("white_label.json");
        if path.exists() {
            Self::from_file(&path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Check that no mapped output is itself a key. A table violating this
    /// would make a second transposition pass rewrite already-transposed
    /// labels.
    pub fn verify(&self) -> AppResult<()> {
        for output in self.entries.values() {
            if self.entries.contains_key(output) {
                return Err(AppError::config(format!(
                    "white-label map output '{}' is also a key; transposition would not be idempotent",
                    output
                )));
            }
        }
        Ok(())
    }

    /// Number of mapped labels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transform a single label for the given role.
    ///
    /// Identity for internal roles; mapped-or-original otherwise.
    pub fn transform(&self, label: &str, role: &Role) -> String {
        if role.is_internal() {
            return label.to_string();
        }
        self.entries
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }

    /// Transform only the named string fields of a JSON object in place.
    /// Fields that are absent or not strings are left untouched.
    pub fn transform_fields(&self, value: &mut serde_json::Value, fields: &[&str], role: &Role) {
        if role.is_internal() {
            return;
        }
        let Some(obj) = value.as_object_mut() else {
            return;
        };
        for field in fields {
            if let Some(serde_json::Value::String(s)) = obj.get_mut(*field) {
                *s = self.transform_str(s);
            }
        }
    }

    /// Transform the `title` field of pillar records in place
    pub fn transform_pillar_titles(&self, pillars: &mut [Pillar], role: &Role) {
        if role.is_internal() {
            return;
        }
        for pillar in pillars {
            pillar.title = self.transform_str(&pillar.title);
        }
    }

    /// Transform an array of plain labels in place
    pub fn transform_all(&self, labels: &mut [String], role: &Role) {
        if role.is_internal() {
            return;
        }
        for label in labels {
            *label = self.transform_str(label);
        }
    }

    fn transform_str(&self, label: &str) -> String {
        self.entries
            .get(label)
            .cloned()
            .unwrap_or_else(|| label.to_string())
    }
}
