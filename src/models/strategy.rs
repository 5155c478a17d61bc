//! Strategy Model
//!
//! The central aggregate: a brand strategy moving through the ordered
//! pipeline phases, owned by exactly one user. Child entities (pillars,
//! market study) are scoped by `strategy_id` and inherit its ownership
//! for authorization purposes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::pillar::Pillar;
use crate::utils::error::{AppError, AppResult};

/// Ordered pipeline phases a strategy moves through.
///
/// Transitions are monotonic forward except explicit skip or
/// administrative reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyPhase {
    /// Initial brand fiche
    Fiche,
    /// Market study upload / manual data entry
    MarketStudy,
    /// Brand audit, part one
    AuditT,
    /// Audit review
    AuditReview,
    /// Implementation planning
    Implementation,
    /// Steering cockpit
    Cockpit,
    /// Pipeline complete
    Complete,
}

impl StrategyPhase {
    /// Get the string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiche => "fiche",
            Self::MarketStudy => "market-study",
            Self::AuditT => "audit-t",
            Self::AuditReview => "audit-review",
            Self::Implementation => "implementation",
            Self::Cockpit => "cockpit",
            Self::Complete => "complete",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fiche" => Some(Self::Fiche),
            "market-study" => Some(Self::MarketStudy),
            "audit-t" => Some(Self::AuditT),
            "audit-review" => Some(Self::AuditReview),
            "implementation" => Some(Self::Implementation),
            "cockpit" => Some(Self::Cockpit),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }

    /// Get the next phase in the pipeline
    pub fn next(&self) -> Self {
        match self {
            Self::Fiche => Self::MarketStudy,
            Self::MarketStudy => Self::AuditT,
            Self::AuditT => Self::AuditReview,
            Self::AuditReview => Self::Implementation,
            Self::Implementation => Self::Cockpit,
            Self::Cockpit => Self::Complete,
            Self::Complete => Self::Complete,
        }
    }

    /// Get the phase index (0-based) for progress calculation
    pub fn index(&self) -> usize {
        match self {
            Self::Fiche => 0,
            Self::MarketStudy => 1,
            Self::AuditT => 2,
            Self::AuditReview => 3,
            Self::Implementation => 4,
            Self::Cockpit => 5,
            Self::Complete => 6,
        }
    }
}

impl std::fmt::Display for StrategyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation status of a strategy, orthogonal to phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyStatus {
    Idle,
    Generating,
    Error,
}

impl StrategyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "generating" => Self::Generating,
            "error" => Self::Error,
            _ => Self::Idle,
        }
    }
}

/// Archival side-status, orthogonal to phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Archived,
    Deleted,
}

impl RecordState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "archived" => Self::Archived,
            "deleted" => Self::Deleted,
            _ => Self::Active,
        }
    }
}

/// Position of a strategy in a brand tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Standalone or root brand
    Master,
    /// Sub-brand under a master node
    Child,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Child => "child",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "child" => Self::Child,
            _ => Self::Master,
        }
    }
}

/// Sparse interview answers keyed by schema variable id.
///
/// This is the owned value object behind the stored JSON blob: all
/// mutation of interview data goes through these methods so the
/// never-overwrite invariant is enforced in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewData(BTreeMap<String, String>);

impl InterviewData {
    /// Create an empty interview-data map
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from the stored JSON blob. An empty or blank blob is an
    /// empty map, not an error.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(raw).map_err(AppError::from)
    }

    /// Serialize for storage
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(&self.0).map_err(AppError::from)
    }

    /// Value for a variable id, if present
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Whether a variable holds a non-empty trimmed value
    pub fn is_filled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|v| !v.trim().is_empty())
    }

    /// Explicit user edit: set or replace a value
    pub fn set(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }

    /// Explicit user edit: remove a value
    pub fn remove(&mut self, id: &str) -> Option<String> {
        self.0.remove(id)
    }

    /// Number of entries (filled or not)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over (id, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for InterviewData {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for InterviewData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The central strategy aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    /// Unique strategy ID
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Brand name
    pub brand_name: String,
    /// Business sector
    pub sector: Option<String>,
    /// Current pipeline phase
    pub phase: StrategyPhase,
    /// Generation status
    pub status: StrategyStatus,
    /// Archival side-status
    pub record_state: RecordState,
    /// Position in the brand tree
    pub node_type: NodeType,
    /// Parent strategy for child brand nodes
    pub parent_id: Option<String>,
    /// Coherence score 0-100, when computed
    pub coherence_score: Option<i32>,
    /// Sparse interview answers
    pub interview_data: InterviewData,
    /// Created timestamp (ISO-8601)
    pub created_at: String,
    /// Last updated timestamp (ISO-8601)
    pub updated_at: String,
}

/// A strategy together with its pillars, as returned by phase operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyWithPillars {
    #[serde(flatten)]
    pub strategy: Strategy,
    pub pillars: Vec<Pillar>,
}
