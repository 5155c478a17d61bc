//! Market Study Model
//!
//! One-to-one with a strategy. Holds two append-only JSON blobs: parsed
//! uploaded files and manually entered data. Manual entries are removable
//! by id (filter-then-rewrite, atomic at the record-update level).

use serde::{Deserialize, Serialize};

/// Lifecycle status of a market study
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStudyStatus {
    Pending,
    Skipped,
    Complete,
}

impl MarketStudyStatus {
    /// Get the string form for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Skipped => "skipped",
            Self::Complete => "complete",
        }
    }

    /// Parse from string, defaulting to pending for unknown values
    pub fn from_str(s: &str) -> Self {
        match s {
            "skipped" => Self::Skipped,
            "complete" => Self::Complete,
            _ => Self::Pending,
        }
    }
}

/// A parsed uploaded file entry (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Unique entry ID
    pub id: String,
    /// Original file name
    pub file_name: String,
    /// Extracted text content
    pub content: String,
    /// Upload timestamp (ISO-8601)
    pub uploaded_at: String,
}

/// A manually entered market-data item (append-only, removable by id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualEntry {
    /// Unique entry ID
    pub id: String,
    /// Entry category (e.g. "competitor", "trend", "figure")
    pub category: String,
    /// Free-form entry text
    pub content: String,
    /// Entry timestamp (ISO-8601)
    pub created_at: String,
}

/// The market-study record for a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketStudy {
    /// Unique record ID
    pub id: String,
    /// Owning strategy ID (unique per strategy)
    pub strategy_id: String,
    /// Lifecycle status
    pub status: MarketStudyStatus,
    /// Append-only parsed-file entries
    pub uploaded_files: Vec<UploadedFile>,
    /// Append-only manual entries, removable by id
    pub manual_data: Vec<ManualEntry>,
    /// Created timestamp (ISO-8601)
    pub created_at: String,
    /// Last updated timestamp (ISO-8601)
    pub updated_at: String,
}
