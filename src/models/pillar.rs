//! Pillar Model
//!
//! A pillar is one of the fixed content categories (A/D/V/E) composing a
//! brand strategy. Pillar content is only trusted as generation context
//! once its status is `complete`.

use serde::{Deserialize, Serialize};

/// Fixed set of pillar types in the A-D-V-E methodology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarType {
    /// Audience: who the brand speaks to
    Audience,
    /// Distinction: what sets the brand apart
    Distinction,
    /// Voice: how the brand expresses itself
    Voice,
    /// Experience: how the brand is lived by its customers
    Experience,
}

impl PillarType {
    /// All pillar types in display order
    pub fn all() -> [PillarType; 4] {
        [
            Self::Audience,
            Self::Distinction,
            Self::Voice,
            Self::Experience,
        ]
    }

    /// Single-letter code used as variable-id prefix
    pub fn code(&self) -> &'static str {
        match self {
            Self::Audience => "A",
            Self::Distinction => "D",
            Self::Voice => "V",
            Self::Experience => "E",
        }
    }

    /// Get the string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audience => "audience",
            Self::Distinction => "distinction",
            Self::Voice => "voice",
            Self::Experience => "experience",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "audience" | "A" => Some(Self::Audience),
            "distinction" | "D" => Some(Self::Distinction),
            "voice" | "V" => Some(Self::Voice),
            "experience" | "E" => Some(Self::Experience),
            _ => None,
        }
    }

    /// Display order within a strategy
    pub fn order(&self) -> i32 {
        match self {
            Self::Audience => 0,
            Self::Distinction => 1,
            Self::Voice => 2,
            Self::Experience => 3,
        }
    }
}

impl std::fmt::Display for PillarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a pillar's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarStatus {
    Pending,
    Generating,
    Complete,
    Error,
}

impl PillarStatus {
    /// Get the string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Generating => "generating",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Parse from string, defaulting to pending for unknown values
    pub fn from_str(s: &str) -> Self {
        match s {
            "generating" => Self::Generating,
            "complete" => Self::Complete,
            "error" => Self::Error,
            _ => Self::Pending,
        }
    }
}

/// A pillar record belonging to a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pillar {
    /// Unique pillar ID
    pub id: String,
    /// Parent strategy ID
    pub strategy_id: String,
    /// Which of the fixed pillar types this is
    pub pillar_type: PillarType,
    /// Content lifecycle status
    pub status: PillarStatus,
    /// Generated or authored content (structured or plain text)
    pub content: Option<String>,
    /// Display title, white-labeled on the way out for external roles
    pub title: String,
    /// Display order
    pub sort_order: i32,
    /// Created timestamp (ISO-8601)
    pub created_at: String,
    /// Last updated timestamp (ISO-8601)
    pub updated_at: String,
}

impl Pillar {
    /// Whether this pillar's content may be used as trusted generation context
    pub fn is_trusted_context(&self) -> bool {
        self.status == PillarStatus::Complete
            && self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}
