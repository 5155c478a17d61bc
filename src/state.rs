//! Application State
//!
//! Wires the storage layer, domain services, and immutable configuration
//! into one shared state value. Configuration (interview schema, white-
//! label table, role policy) is loaded once here and injected by
//! reference everywhere else.

use std::path::Path;
use std::sync::Arc;

use crate::services::autofill::AutoFillEngine;
use crate::services::interview::schema::InterviewSchema;
use crate::services::llm::provider::GenerationProvider;
use crate::services::mapping::MappingService;
use crate::services::phase::PhaseManager;
use crate::services::role::{RoleResolver, UnknownRolePolicy};
use crate::services::whitelabel::WhiteLabelMap;
use crate::storage::{Database, MarketStudyStore, StrategyStore};
use crate::utils::error::AppResult;

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub strategies: StrategyStore,
    pub market_studies: MarketStudyStore,
    pub phase: PhaseManager,
    pub autofill: AutoFillEngine,
    pub mapping: MappingService,
    pub schema: InterviewSchema,
    pub white_label: WhiteLabelMap,
    pub roles: RoleResolver,
}

impl AppState {
    /// Build state over an initialized database, loading configuration
    /// from the given root directory
    pub fn new(
        db: Database,
        provider: Arc<dyn GenerationProvider>,
        config_root: impl AsRef<Path>,
    ) -> Self {
        let schema = InterviewSchema::load_or_default(&config_root);
        let white_label = WhiteLabelMap::load_or_default(&config_root);
        Self::with_config(db, provider, schema, white_label, UnknownRolePolicy::default())
    }

    /// Build state with explicit configuration values
    pub fn with_config(
        db: Database,
        provider: Arc<dyn GenerationProvider>,
        schema: InterviewSchema,
        white_label: WhiteLabelMap,
        role_policy: UnknownRolePolicy,
    ) -> Self {
        let strategies = StrategyStore::new(db.pool().clone());
        let market_studies = MarketStudyStore::new(db.pool().clone());
        let phase = PhaseManager::new(strategies.clone(), market_studies.clone());
        let autofill = AutoFillEngine::new(strategies.clone(), provider.clone());
        let mapping = MappingService::new(provider);

        Self {
            db,
            strategies,
            market_studies,
            phase,
            autofill,
            mapping,
            schema,
            white_label,
            roles: RoleResolver::new(role_policy),
        }
    }

    /// In-memory state for tests
    pub fn in_memory(provider: Arc<dyn GenerationProvider>) -> AppResult<Self> {
        let db = Database::new_in_memory()?;
        Ok(Self::with_config(
            db,
            provider,
            InterviewSchema::default(),
            WhiteLabelMap::default(),
            UnknownRolePolicy::default(),
        ))
    }
}
