//! Phase Progression Integration Tests
//!
//! Tests the full phase pipeline through the handler layer: market-study
//! completion and skipping, the conditional transition guard, standalone
//! study completion, archival, and administrative reset.

use std::sync::Arc;

use async_trait::async_trait;

use advertis::handlers::market_study::{
    add_manual_entry, add_uploaded_file, complete_market_study, complete_study_standalone,
    get_market_study, skip_market_study,
};
use advertis::handlers::strategy::{
    advance_phase, archive_strategy, create_strategy, get_strategy, reset_phase,
    unarchive_strategy, CreateStrategyRequest,
};
use advertis::handlers::Identity;
use advertis::models::market_study::MarketStudyStatus;
use advertis::models::strategy::{RecordState, StrategyPhase, StrategyStatus};
use advertis::services::llm::provider::GenerationProvider;
use advertis::services::llm::types::{GenerationRequest, GenerationResult};
use advertis::AppState;

// ============================================================================
// Helpers
// ============================================================================

struct NoopProvider;

#[async_trait]
impl GenerationProvider for NoopProvider {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn model(&self) -> &str {
        "noop"
    }

    async fn generate(&self, _request: GenerationRequest) -> GenerationResult<String> {
        Ok("{}".to_string())
    }
}

fn create_state() -> AppState {
    AppState::in_memory(Arc::new(NoopProvider)).unwrap()
}

fn operator(state: &AppState) -> Identity {
    Identity::resolve(&state.roles, "user-1", "operator")
}

fn create(state: &AppState, identity: &Identity) -> String {
    create_strategy(
        state,
        identity,
        CreateStrategyRequest {
            brand_name: "Maison Verte".into(),
            sector: Some("home goods".into()),
            node_type: None,
            parent_id: None,
        },
    )
    .data
    .unwrap()
    .id
}

// ============================================================================
// Phase sequence
// ============================================================================

#[test]
fn test_full_phase_walk() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);

    let expected = [
        StrategyPhase::Fiche,
        StrategyPhase::MarketStudy,
        StrategyPhase::AuditT,
        StrategyPhase::AuditReview,
        StrategyPhase::Implementation,
        StrategyPhase::Cockpit,
        StrategyPhase::Complete,
    ];

    for window in expected.windows(2) {
        let resp = advance_phase(&state, &identity, &sid, window[0]);
        assert_eq!(resp.data.unwrap().phase, window[1]);
    }

    // Terminal phase cannot advance
    let resp = advance_phase(&state, &identity, &sid, StrategyPhase::Complete);
    assert_eq!(resp.error.unwrap().status, 400);
}

#[test]
fn test_stale_phase_claim_rejected() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);

    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);

    // A second caller still believing the strategy is in fiche
    let resp = advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);
    let err = resp.error.unwrap();
    assert_eq!(err.status, 400);
    assert!(err.error.contains("requires phase 'fiche'"));
    assert!(err.error.contains("'market-study'"));
}

// ============================================================================
// Market study lifecycle
// ============================================================================

#[test]
fn test_market_study_completion_flow() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);
    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);

    add_uploaded_file(&state, &identity, &sid, "etude.pdf", "market figures");
    add_manual_entry(&state, &identity, &sid, "competitor", "two regional players");

    let resp = complete_market_study(&state, &identity, &sid);
    let view = resp.data.unwrap();
    assert_eq!(view.strategy.phase, StrategyPhase::AuditT);
    assert_eq!(view.strategy.status, StrategyStatus::Generating);
    assert_eq!(view.pillars.len(), 4);
    // Internal role keeps internal titles
    assert_eq!(view.pillars[0].title, "Pilier Audience");

    let study = get_market_study(&state, &identity, &sid).data.unwrap();
    assert_eq!(study.status, MarketStudyStatus::Complete);
    assert_eq!(study.uploaded_files.len(), 1);
    assert_eq!(study.manual_data.len(), 1);
}

#[test]
fn test_double_completion_is_a_phase_error() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);
    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);

    assert!(complete_market_study(&state, &identity, &sid).success);

    let err = complete_market_study(&state, &identity, &sid).error.unwrap();
    assert_eq!(err.status, 400);
    assert!(err.error.contains("requires phase 'market-study'"));
    assert!(err.error.contains("'audit-t'"));
}

#[test]
fn test_skip_records_the_decision() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);
    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);

    let view = skip_market_study(&state, &identity, &sid).data.unwrap();
    assert_eq!(view.strategy.phase, StrategyPhase::AuditT);

    let study = get_market_study(&state, &identity, &sid).data.unwrap();
    assert_eq!(study.status, MarketStudyStatus::Skipped);
}

#[test]
fn test_standalone_completion_leaves_phase_alone() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);

    // No study record yet: standalone completion refuses
    let resp = complete_study_standalone(&state, &identity, &sid);
    assert_eq!(resp.error.unwrap().status, 404);

    get_market_study(&state, &identity, &sid); // lazily creates the record
    assert!(complete_study_standalone(&state, &identity, &sid).success);

    let strategy = get_strategy(&state, &identity, &sid).data.unwrap().strategy;
    assert_eq!(strategy.phase, StrategyPhase::Fiche);
    let study = get_market_study(&state, &identity, &sid).data.unwrap();
    assert_eq!(study.status, MarketStudyStatus::Complete);
}

// ============================================================================
// Archival and reset
// ============================================================================

#[test]
fn test_archive_is_orthogonal_to_phase() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);
    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);

    assert!(archive_strategy(&state, &identity, &sid).success);
    let strategy = get_strategy(&state, &identity, &sid).data.unwrap().strategy;
    assert_eq!(strategy.record_state, RecordState::Archived);
    assert_eq!(strategy.phase, StrategyPhase::MarketStudy);

    assert!(unarchive_strategy(&state, &identity, &sid).success);
    let strategy = get_strategy(&state, &identity, &sid).data.unwrap().strategy;
    assert_eq!(strategy.record_state, RecordState::Active);
}

#[test]
fn test_admin_reset_rewinds_without_deleting_data() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);
    advance_phase(&state, &identity, &sid, StrategyPhase::Fiche);
    add_manual_entry(&state, &identity, &sid, "trend", "premium niches");
    skip_market_study(&state, &identity, &sid);

    let admin = Identity::resolve(&state.roles, "user-1", "admin");
    let strategy = reset_phase(&state, &admin, &sid, StrategyPhase::MarketStudy)
        .data
        .unwrap();
    assert_eq!(strategy.phase, StrategyPhase::MarketStudy);
    assert_eq!(strategy.status, StrategyStatus::Idle);

    // Study data collected before the reset is still there
    let study = get_market_study(&state, &identity, &sid).data.unwrap();
    assert_eq!(study.manual_data.len(), 1);
}

#[test]
fn test_ownership_masked_as_not_found_across_handlers() {
    let state = create_state();
    let identity = operator(&state);
    let sid = create(&state, &identity);

    let other = Identity::resolve(&state.roles, "user-2", "operator");
    assert_eq!(get_strategy(&state, &other, &sid).error.unwrap().status, 404);
    assert_eq!(
        get_market_study(&state, &other, &sid).error.unwrap().status,
        404
    );
    assert_eq!(
        complete_market_study(&state, &other, &sid).error.unwrap().status,
        404
    );
}
