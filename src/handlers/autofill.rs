//! Auto-Fill Handler
//!
//! Boundary for the AI interview auto-fill run. The capability gate runs
//! before the ownership check so a forbidden caller learns nothing about
//! the strategy.

use serde::Serialize;

use crate::models::response::ApiResponse;
use crate::models::strategy::InterviewData;
use crate::services::role::Capability;
use crate::state::AppState;
use crate::utils::error::AppResult;

use super::{require, Identity};

/// Auto-fill result returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct AutoFillResponse {
    /// Interview data after the merge
    pub filled_data: InterviewData,
    /// Variable ids the run filled
    pub auto_filled_ids: Vec<String>,
    /// Filled variables after the run, out of the schema total
    pub total_filled: usize,
    /// Schema variable count
    pub total_variables: usize,
}

/// Run auto-fill for the caller's strategy
pub async fn auto_fill_interview(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<AutoFillResponse> {
    auto_fill_inner(state, identity, strategy_id).await.into()
}

async fn auto_fill_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> AppResult<AutoFillResponse> {
    require(state, identity, Capability::AutoFill)?;

    let outcome = state
        .autofill
        .auto_fill(&state.schema, strategy_id, &identity.user_id)
        .await?;

    Ok(AutoFillResponse {
        filled_data: outcome.filled_data,
        auto_filled_ids: outcome.auto_filled_ids,
        total_filled: outcome.total_filled,
        total_variables: state.schema.len(),
    })
}
