//! Interview Variable Engine
//!
//! Schema of named interview variables grouped into pillar sections,
//! completion tracking, and the overwrite-free merge of generated values.

pub mod completion;
pub mod schema;

pub use completion::{merge_generated, split_by_completion, CompletionSplit, MergeOutcome};
pub use schema::{InterviewSchema, InterviewVariable, PillarSection};
