//! Interview auto-fill: prompt assembly and run orchestration

pub mod engine;
pub mod prompt;

pub use engine::{AutoFillEngine, AutoFillOutcome, FillStage};
pub use prompt::{build_fill_request, pillar_context, PILLAR_CONTEXT_BUDGET};
