//! Market Study Handlers
//!
//! Upload entries, manual data, and the three study closing operations:
//! complete (advances the phase), skip (same transition, different
//! outcome), and standalone completion (no phase change).

use crate::models::market_study::{ManualEntry, MarketStudy, UploadedFile};
use crate::models::response::ApiResponse;
use crate::models::strategy::StrategyWithPillars;
use crate::services::role::Capability;
use crate::state::AppState;
use crate::utils::error::AppResult;

use super::{require, Identity};

/// Fetch (or lazily create) the study record for a strategy
pub fn get_market_study(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<MarketStudy> {
    get_inner(state, identity, strategy_id).into()
}

fn get_inner(state: &AppState, identity: &Identity, strategy_id: &str) -> AppResult<MarketStudy> {
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state.market_studies.get_or_create(strategy_id)
}

/// Append a parsed uploaded file to the study
pub fn add_uploaded_file(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    file_name: &str,
    content: &str,
) -> ApiResponse<UploadedFile> {
    add_file_inner(state, identity, strategy_id, file_name, content).into()
}

fn add_file_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    file_name: &str,
    content: &str,
) -> AppResult<UploadedFile> {
    require(state, identity, Capability::ManageStrategies)?;
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state
        .market_studies
        .add_uploaded_file(strategy_id, file_name, content)
}

/// Append a manual market-data entry
pub fn add_manual_entry(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    category: &str,
    content: &str,
) -> ApiResponse<ManualEntry> {
    add_entry_inner(state, identity, strategy_id, category, content).into()
}

fn add_entry_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    category: &str,
    content: &str,
) -> AppResult<ManualEntry> {
    require(state, identity, Capability::ManageStrategies)?;
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state
        .market_studies
        .add_manual_entry(strategy_id, category, content)
}

/// Remove a manual entry by id
pub fn remove_manual_entry(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    entry_id: &str,
) -> ApiResponse<()> {
    remove_entry_inner(state, identity, strategy_id, entry_id).into()
}

fn remove_entry_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    entry_id: &str,
) -> AppResult<()> {
    require(state, identity, Capability::ManageStrategies)?;
    state.strategies.get_owned(strategy_id, &identity.user_id)?;
    state.market_studies.remove_manual_entry(strategy_id, entry_id)
}

/// Close the market-study phase with the collected data
pub fn complete_market_study(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<StrategyWithPillars> {
    complete_inner(state, identity, strategy_id, false).into()
}

/// Skip the market-study phase
pub fn skip_market_study(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<StrategyWithPillars> {
    complete_inner(state, identity, strategy_id, true).into()
}

fn complete_inner(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
    skip: bool,
) -> AppResult<StrategyWithPillars> {
    require(state, identity, Capability::AdvancePhase)?;
    let strategy = if skip {
        state.phase.skip_market_study(strategy_id, &identity.user_id)?
    } else {
        state.phase.complete_market_study(strategy_id, &identity.user_id)?
    };

    let mut pillars = state.strategies.load_pillars(strategy_id)?;
    state
        .white_label
        .transform_pillar_titles(&mut pillars, &identity.role);
    Ok(StrategyWithPillars { strategy, pillars })
}

/// Mark the study complete without advancing the phase
pub fn complete_study_standalone(
    state: &AppState,
    identity: &Identity,
    strategy_id: &str,
) -> ApiResponse<()> {
    standalone_inner(state, identity, strategy_id).into()
}

fn standalone_inner(state: &AppState, identity: &Identity, strategy_id: &str) -> AppResult<()> {
    require(state, identity, Capability::ManageStrategies)?;
    state
        .phase
        .complete_study_standalone(strategy_id, &identity.user_id)
}
