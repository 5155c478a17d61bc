//! Strategy Handlers
//!
//! Create, view, advance, archive, and reset strategies. Views are
//! role-aware: pillar titles are transposed to client vocabulary for
//! external roles before leaving this layer.

use serde::Deserialize;
use tracing::info;

use crate::models::response::ApiResponse;
use crate::models::strategy::{NodeType, Strategy, StrategyPhase, StrategyWithPillars};
use crate::services::role::Capability;
use crate::state::AppState;
use crate::storage::NewStrategy;
use crate::utils::error::{AppError, AppResult};

use super::{require, Identity};

/// Payload for creating a strategy
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStrategyRequest {
    pub brand_name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub node_type: Option<NodeType>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Create a strategy for the caller
pub fn create_strategy(
    state: &AppState,
    identity: &Identity,
    request: CreateStrategyRequest,
) -> ApiResponse<Strategy> {
    create_strategy_inner(state, identity, request).into()
}

fn create_strategy_inner(
    state: &AppState,
    identity: &Identity,
    request: CreateStrategyRequest,
) -> AppResult<Strategy> {
    require(state, identity, Capability::ManageStrategies)?;

    let brand_name = request.brand_name.trim();
    if brand_name.is_empty() {
        return Err(AppError::validation("brand name cannot be empty"));
    }

    let node_type = request.node_type.unwrap_or(NodeType::Master);
    if node_type == NodeType::Child {
        let parent_id = request
            .parent_id
            .as_deref()
            .ok_or_else(|| AppError::validation("child node requires a parent_id"))?;
        // Parent must exist and belong to the caller
        state.strategies.get_owned(parent_id, &identity.user_id)?;
    }

    let strategy = state.strategies.create(NewStrategy {
        user_id: identity.user_id.clone(),
        brand_name: brand_name.to_string(),
        sector: request.sector,
        node_type,
        parent_id: request.parent_id,
    })?;

    info!(strategy_id = %strategy.id, user_id = %identity.user_id, "strategy created");
    Ok(strategy)
}

/// Fetch a strategy with its pillars, labels transposed for the caller's
/// role
pub fn get_strategy(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<StrategyWithPillars> {
    get_strategy_inner(state, identity, strategy_id).into()
}

fn get_strategy_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> AppResult<StrategyWithPillars> {
    let strategy = state.strategies.get_owned(strategy_id, &identity.user_id)?;
    let mut pillars = state.strategies.load_pillars(strategy_id)?;
    state
        .white_label
        .transform_pillar_titles(&mut pillars, &identity.role);
    Ok(StrategyWithPillars { strategy, pillars })
}

/// Child brand nodes of a strategy the caller owns
pub fn list_children(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<Vec<Strategy>> {
    list_children_inner(state, identity, strategy_id).into()
}

fn list_children_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> AppResult<Vec<Strategy>> {
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state.strategies.get_children(strategy_id)
}

/// Replace the caller's interview data (last write wins)
pub fn update_interview_data(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    data: std::collections::BTreeMap<String, String>,
) -> ApiResponse<Strategy> {
    update_interview_data_inner(state, identity, strategy_id, data).into()
}

fn update_interview_data_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    data: std::collections::BTreeMap<String, String>,
) -> AppResult<Strategy> {
    require(state, identity, Capability::ManageStrategies)?;
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state
        .strategies
        .update_interview_data(strategy_id, &data.into())?;
    state.strategies.get_owned(strategy_id, &identity.user_id)
}

/// Advance one phase forward from the phase the caller believes the
/// strategy is in
pub fn advance_phase(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    from: StrategyPhase,
) -> ApiResponse<Strategy> {
    advance_phase_inner(state, identity, strategy_id, from).into()
}

fn advance_phase_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    from: StrategyPhase,
) -> AppResult<Strategy> {
    require(state, identity, Capability::AdvancePhase)?;
    state.phase.advance_from(strategy_id, &identity.user_id, from)
}

/// Administrative reset of a strategy to an arbitrary phase
pub fn reset_phase(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    phase: StrategyPhase,
) -> ApiResponse<Strategy> {
    reset_phase_inner(state, identity, strategy_id, phase).into()
}

fn reset_phase_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    phase: StrategyPhase,
) -> AppResult<Strategy> {
    require(state, identity, Capability::AdminReset)?;
    state.phase.reset_phase(strategy_id, phase)
}

/// Archive a strategy
pub fn archive_strategy(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<()> {
    archive_inner(state, identity, strategy_id, true).into()
}

/// Restore an archived strategy
pub fn unarchive_strategy(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<()> {
    archive_inner(state, identity, strategy_id, false).into()
}

fn archive_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    archive: bool,
) -> AppResult<()> {
    require(state, identity, Capability::ManageStrategies)?;
    if archive {
        state.phase.archive(strategy_id, &identity.user_id)
    } else {
        state.phase.unarchive(strategy_id, &identity.user_id)
    }
}
