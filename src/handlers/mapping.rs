//! Free-Text Mapping Handler
//!
//! Maps a pasted brand document to interview variables and returns the
//! preview. Applying the preview goes through the normal interview-data
//! update so the merge rules hold.

use crate::models::response::ApiResponse;
use crate::services::mapping::{MapTextRequest, MappedVariables};
use crate::services::role::Capability;
use crate::state::AppState;
use crate::utils::error::AppResult;

use super::{require, Identity};

/// Map free text onto the interview variable space. Brand name and
/// sector are optional hints carried into the extraction prompt.
pub async fn map_free_text(
    state: &AppState,
    identity: &Identity,
    request: MapTextRequest,
) -> ApiResponse<MappedVariables> {
    map_inner(state, identity, request).await.into()
}

async fn map_inner(
    state: &AppState,
    identity: &Identity,
    request: MapTextRequest,
) -> AppResult<MappedVariables> {
    require(state, identity, Capability::AutoFill)?;
    state.mapping.map_free_text(&state.schema, &request).await
}
