//! Phase Progression
//!
//! Drives a strategy through its fixed phase sequence. Transitions are
//! guarded twice: an up-front check produces the user-facing phase error,
//! and the store's conditional update closes the race window between
//! concurrent callers. Whoever loses the conditional update gets the same
//! phase error as a caller who arrived late.

use tracing::info;

use crate::models::market_study::MarketStudyStatus;
use crate::models::strategy::{RecordState, Strategy, StrategyPhase, StrategyStatus};
use crate::storage::{MarketStudyStore, StrategyStore};
use crate::utils::error::{AppError, AppResult};

/// Orchestrates phase transitions for strategies
#[derive(Clone)]
pub struct PhaseManager {
    strategies: StrategyStore,
    market_studies: MarketStudyStore,
}

impl PhaseManager {
    /// Create a new phase manager over the given stores
    pub fn new(strategies: StrategyStore, market_studies: MarketStudyStore) -> Self {
        Self {
            strategies,
            market_studies,
        }
    }

    /// Close the market-study phase with collected data and move the
    /// strategy into audit generation.
    pub fn complete_market_study(&self, strategy_id: &str, user_id: &str) -> AppResult<Strategy> {
        self.close_market_study(strategy_id, user_id, MarketStudyStatus::Complete)
    }

    /// Skip the market-study phase entirely. The study record is created
    /// if it does not exist so the skip decision is persisted.
    pub fn skip_market_study(&self, strategy_id: &str, user_id: &str) -> AppResult<Strategy> {
        self.close_market_study(strategy_id, user_id, MarketStudyStatus::Skipped)
    }

    fn close_market_study(
        &self,
        strategy_id: &str,
        user_id: &str,
        outcome: MarketStudyStatus,
    ) -> AppResult<Strategy> {
        let strategy = self.strategies.get_owned(strategy_id, user_id)?;
        self.require_phase(&strategy, StrategyPhase::MarketStudy)?;

        self.market_studies.get_or_create(strategy_id)?;
        self.market_studies.set_status(strategy_id, outcome)?;

        let advanced = self.strategies.advance_phase_if(
            strategy_id,
            StrategyPhase::MarketStudy,
            StrategyPhase::AuditT,
            StrategyStatus::Generating,
        )?;
        if !advanced {
            // A concurrent caller won the transition between our read
            // and the update.
            let current = self.strategies.get_owned(strategy_id, user_id)?;
            return Err(AppError::invalid_phase(
                StrategyPhase::MarketStudy.as_str(),
                current.phase.as_str(),
            ));
        }

        info!(
            strategy_id = %strategy_id,
            outcome = outcome.as_str(),
            "market-study phase closed, audit generation started"
        );
        self.strategies.get_owned(strategy_id, user_id)
    }

    /// Mark the study complete without touching the phase. Used when the
    /// study is revisited after the strategy already moved on; requires
    /// an existing study record.
    pub fn complete_study_standalone(&self, strategy_id: &str, user_id: &str) -> AppResult<()> {
        self.strategies.get_owned(strategy_id, user_id)?;
        if self.market_studies.get_by_strategy(strategy_id)?.is_none() {
            return Err(AppError::not_found(format!(
                "Market study not found for strategy: {}",
                strategy_id
            )));
        }
        self.market_studies
            .set_status(strategy_id, MarketStudyStatus::Complete)
    }

    /// Advance one phase forward from the given required phase
    pub fn advance_from(
        &self,
        strategy_id: &str,
        user_id: &str,
        required: StrategyPhase,
    ) -> AppResult<Strategy> {
        let strategy = self.strategies.get_owned(strategy_id, user_id)?;
        self.require_phase(&strategy, required)?;

        if required == StrategyPhase::Complete {
            return Err(AppError::validation(
                "phase 'complete' is terminal and cannot advance",
            ));
        }
        let next = required.next();

        let advanced =
            self.strategies
                .advance_phase_if(strategy_id, required, next, StrategyStatus::Idle)?;
        if !advanced {
            let current = self.strategies.get_owned(strategy_id, user_id)?;
            return Err(AppError::invalid_phase(
                required.as_str(),
                current.phase.as_str(),
            ));
        }

        info!(
            strategy_id = %strategy_id,
            from = required.as_str(),
            to = next.as_str(),
            "phase advanced"
        );
        self.strategies.get_owned(strategy_id, user_id)
    }

    /// Administrative reset to an arbitrary phase. Data produced in later
    /// phases is left in place.
    pub fn reset_phase(&self, strategy_id: &str, phase: StrategyPhase) -> AppResult<Strategy> {
        self.strategies.set_phase(strategy_id, phase)?;
        self.strategies.set_status(strategy_id, StrategyStatus::Idle)?;
        info!(strategy_id = %strategy_id, phase = phase.as_str(), "phase reset");
        self.strategies
            .get(strategy_id)?
            .ok_or_else(|| AppError::not_found(format!("Strategy not found: {}", strategy_id)))
    }

    /// Archive a strategy. Archival is a side-status and never changes
    /// the phase.
    pub fn archive(&self, strategy_id: &str, user_id: &str) -> AppResult<()> {
        self.strategies.get_owned(strategy_id, user_id)?;
        self.strategies.set_record_state(strategy_id, RecordState::Archived)
    }

    /// Restore an archived strategy
    pub fn unarchive(&self, strategy_id: &str, user_id: &str) -> AppResult<()> {
        self.strategies.get_owned(strategy_id, user_id)?;
        self.strategies.set_record_state(strategy_id, RecordState::Active)
    }

    fn require_phase(&self, strategy: &Strategy, required: StrategyPhase) -> AppResult<()> {
        if strategy.phase != required {
            return Err(AppError::invalid_phase(
                required.as_str(),
                strategy.phase.as_str(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::strategy::NodeType;
    use crate::storage::{Database, NewStrategy};

    fn setup() -> (PhaseManager, StrategyStore, MarketStudyStore, String) {
        let db = Database::new_in_memory().unwrap();
        let strategies = StrategyStore::new(db.pool().clone());
        let market_studies = MarketStudyStore::new(db.pool().clone());
        let strategy = strategies
            .create(NewStrategy {
                user_id: "u1".into(),
                brand_name: "Acme".into(),
                sector: None,
                node_type: NodeType::Master,
                parent_id: None,
            })
            .unwrap();
        let manager = PhaseManager::new(strategies.clone(), market_studies.clone());
        (manager, strategies, market_studies, strategy.id)
    }

    #[test]
    fn test_complete_market_study_advances_to_audit() {
        let (manager, strategies, studies, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::MarketStudy).unwrap();

        let strategy = manager.complete_market_study(&sid, "u1").unwrap();
        assert_eq!(strategy.phase, StrategyPhase::AuditT);
        assert_eq!(strategy.status, StrategyStatus::Generating);

        let study = studies.get_by_strategy(&sid).unwrap().unwrap();
        assert_eq!(study.status, MarketStudyStatus::Complete);
    }

    #[test]
    fn test_double_completion_reports_phase_error() {
        let (manager, strategies, _, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::MarketStudy).unwrap();

        manager.complete_market_study(&sid, "u1").unwrap();
        let err = manager.complete_market_study(&sid, "u1").unwrap_err();
        match err {
            AppError::InvalidPhase { required, actual } => {
                assert_eq!(required, "market-study");
                assert_eq!(actual, "audit-t");
            }
            other => panic!("expected InvalidPhase, got {other:?}"),
        }
    }

    #[test]
    fn test_skip_creates_study_record() {
        let (manager, strategies, studies, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::MarketStudy).unwrap();
        assert!(studies.get_by_strategy(&sid).unwrap().is_none());

        manager.skip_market_study(&sid, "u1").unwrap();
        let study = studies.get_by_strategy(&sid).unwrap().unwrap();
        assert_eq!(study.status, MarketStudyStatus::Skipped);
    }

    #[test]
    fn test_wrong_phase_rejected_before_any_write() {
        let (manager, _, studies, sid) = setup();
        // Still in fiche
        let err = manager.complete_market_study(&sid, "u1").unwrap_err();
        assert!(matches!(err, AppError::InvalidPhase { .. }));
        assert!(studies.get_by_strategy(&sid).unwrap().is_none());
    }

    #[test]
    fn test_standalone_completion_requires_existing_record() {
        let (manager, strategies, studies, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::Cockpit).unwrap();

        let err = manager.complete_study_standalone(&sid, "u1").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        studies.get_or_create(&sid).unwrap();
        manager.complete_study_standalone(&sid, "u1").unwrap();

        // Phase untouched
        let strategy = strategies.get(&sid).unwrap().unwrap();
        assert_eq!(strategy.phase, StrategyPhase::Cockpit);
    }

    #[test]
    fn test_advance_from_walks_the_sequence() {
        let (manager, strategies, _, sid) = setup();
        let s = manager.advance_from(&sid, "u1", StrategyPhase::Fiche).unwrap();
        assert_eq!(s.phase, StrategyPhase::MarketStudy);

        // Stale phase loses
        let err = manager.advance_from(&sid, "u1", StrategyPhase::Fiche).unwrap_err();
        assert!(matches!(err, AppError::InvalidPhase { .. }));

        strategies.set_phase(&sid, StrategyPhase::Cockpit).unwrap();
        let s = manager.advance_from(&sid, "u1", StrategyPhase::Cockpit).unwrap();
        assert_eq!(s.phase, StrategyPhase::Complete);

        let err = manager.advance_from(&sid, "u1", StrategyPhase::Complete).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_reset_phase() {
        let (manager, strategies, _, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::Implementation).unwrap();
        let s = manager.reset_phase(&sid, StrategyPhase::AuditReview).unwrap();
        assert_eq!(s.phase, StrategyPhase::AuditReview);
        assert_eq!(s.status, StrategyStatus::Idle);
    }

    #[test]
    fn test_archive_preserves_phase() {
        let (manager, strategies, _, sid) = setup();
        strategies.set_phase(&sid, StrategyPhase::Cockpit).unwrap();
        manager.archive(&sid, "u1").unwrap();

        let s = strategies.get(&sid).unwrap().unwrap();
        assert_eq!(s.record_state, RecordState::Archived);
        assert_eq!(s.phase, StrategyPhase::Cockpit);

        manager.unarchive(&sid, "u1").unwrap();
        let s = strategies.get(&sid).unwrap().unwrap();
        assert_eq!(s.record_state, RecordState::Active);
    }

    #[test]
    fn test_archive_requires_ownership() {
        let (manager, _, _, sid) = setup();
        let err = manager.archive(&sid, "intruder").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
