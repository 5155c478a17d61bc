//! Auto-Fill Engine
//!
//! Runs the interview auto-fill lifecycle: compute the empty set, prompt
//! the model for just those variables, parse strictly, merge without
//! overwriting, persist. The merge re-reads the strategy after the model
//! call so values the user typed during generation win over generated
//! ones.

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::strategy::InterviewData;
use crate::services::interview::completion::{merge_generated, split_by_completion};
use crate::services::interview::schema::InterviewSchema;
use crate::services::llm::extraction::extract_variable_map;
use crate::services::llm::provider::GenerationProvider;
use crate::storage::StrategyStore;
use crate::utils::error::{AppError, AppResult};

use super::prompt::build_fill_request;

/// Observable stage of a fill run, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStage {
    ComputingEmptySet,
    ShortCircuit,
    Prompting,
    AwaitingModel,
    ParsingResponse,
    Merging,
    Done,
}

impl FillStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComputingEmptySet => "computing-empty-set",
            Self::ShortCircuit => "short-circuit",
            Self::Prompting => "prompting",
            Self::AwaitingModel => "awaiting-model",
            Self::ParsingResponse => "parsing-response",
            Self::Merging => "merging",
            Self::Done => "done",
        }
    }
}

/// Result of an auto-fill run
#[derive(Debug, Clone)]
pub struct AutoFillOutcome {
    /// The interview data after the merge was persisted
    pub filled_data: InterviewData,
    /// Ids accepted from the model, sorted
    pub auto_filled_ids: Vec<String>,
    /// Total filled variables after the run
    pub total_filled: usize,
}

/// Orchestrates AI interview auto-fill
pub struct AutoFillEngine {
    strategies: StrategyStore,
    provider: Arc<dyn GenerationProvider>,
}

impl AutoFillEngine {
    /// Create an engine over the given store and provider
    pub fn new(strategies: StrategyStore, provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            strategies,
            provider,
        }
    }

    /// Fill the empty interview variables of a strategy.
    ///
    /// If every schema variable already holds a value the run ends
    /// without a model call. Parse failures are fatal for the run; no
    /// partial values are persisted from an unparseable response.
    pub async fn auto_fill(
        &self,
        schema: &InterviewSchema,
        strategy_id: &str,
        user_id: &str,
    ) -> AppResult<AutoFillOutcome> {
        let strategy = self.strategies.get_owned(strategy_id, user_id)?;

        debug!(
            strategy_id = %strategy_id,
            stage = FillStage::ComputingEmptySet.as_str(),
            "auto-fill started"
        );
        let split = split_by_completion(schema, &strategy.interview_data);

        if split.empty.is_empty() {
            debug!(
                strategy_id = %strategy_id,
                stage = FillStage::ShortCircuit.as_str(),
                "all variables filled, skipping model call"
            );
            let total_filled = split.filled.len();
            return Ok(AutoFillOutcome {
                filled_data: strategy.interview_data,
                auto_filled_ids: Vec::new(),
                total_filled,
            });
        }

        debug!(
            strategy_id = %strategy_id,
            stage = FillStage::Prompting.as_str(),
            empty_count = split.empty.len(),
            "building fill prompt"
        );
        let pillars = self.strategies.load_pillars(strategy_id)?;
        let request = build_fill_request(&strategy, &split, &pillars);

        debug!(
            strategy_id = %strategy_id,
            stage = FillStage::AwaitingModel.as_str(),
            provider = self.provider.name(),
            model = self.provider.model(),
            "calling generation provider"
        );
        let raw = self
            .provider
            .generate(request)
            .await
            .map_err(AppError::from)?;

        debug!(strategy_id = %strategy_id, stage = FillStage::ParsingResponse.as_str(), "parsing model response");
        let generated = extract_variable_map(&raw)?;

        debug!(strategy_id = %strategy_id, stage = FillStage::Merging.as_str(), "merging generated values");
        // Re-read so anything typed during the model call is treated as
        // filled and never overwritten.
        let fresh = self.strategies.get_owned(strategy_id, user_id)?;
        let fresh_split = split_by_completion(schema, &fresh.interview_data);
        let outcome = merge_generated(&fresh.interview_data, &generated, &fresh_split.empty_ids());

        self.strategies
            .update_interview_data(strategy_id, &outcome.merged)?;

        let total_filled = split_by_completion(schema, &outcome.merged).filled.len();
        info!(
            strategy_id = %strategy_id,
            stage = FillStage::Done.as_str(),
            accepted = outcome.auto_filled_ids.len(),
            total_filled,
            "auto-fill finished"
        );

        Ok(AutoFillOutcome {
            filled_data: outcome.merged,
            auto_filled_ids: outcome.auto_filled_ids,
            total_filled,
        })
    }
}
