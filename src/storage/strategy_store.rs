//! Strategy Store
//!
//! Persistence for strategies and their pillars. Ownership checks live
//! here: `get_owned` reports an ownership mismatch identically to a
//! missing record so non-owners cannot confirm a strategy exists.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::pillar::{Pillar, PillarStatus, PillarType};
use crate::models::strategy::{
    InterviewData, NodeType, RecordState, Strategy, StrategyPhase, StrategyStatus,
};
use crate::storage::database::DbPool;
use crate::utils::error::{AppError, AppResult};

/// Parameters for creating a strategy
#[derive(Debug, Clone)]
pub struct NewStrategy {
    pub user_id: String,
    pub brand_name: String,
    pub sector: Option<String>,
    pub node_type: NodeType,
    pub parent_id: Option<String>,
}

/// Internal display titles for freshly created pillars
fn default_pillar_title(pillar_type: PillarType) -> String {
    format!("Pilier {}", capitalize(pillar_type.as_str()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Manages strategy and pillar persistence
#[derive(Clone)]
pub struct StrategyStore {
    pool: DbPool,
}

impl StrategyStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Create a strategy in phase `fiche` with its four pending pillars
    pub fn create(&self, new: NewStrategy) -> AppResult<Strategy> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO strategies
             (id, user_id, brand_name, sector, phase, status, record_state,
              node_type, parent_id, interview_data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, '{}', ?10, ?10)",
            params![
                id,
                new.user_id,
                new.brand_name,
                new.sector,
                StrategyPhase::Fiche.as_str(),
                StrategyStatus::Idle.as_str(),
                RecordState::Active.as_str(),
                new.node_type.as_str(),
                new.parent_id,
                now,
            ],
        )?;

        for pillar_type in PillarType::all() {
            conn.execute(
                "INSERT INTO pillars
                 (id, strategy_id, pillar_type, status, title, sort_order, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    Uuid::new_v4().to_string(),
                    id,
                    pillar_type.as_str(),
                    PillarStatus::Pending.as_str(),
                    default_pillar_title(pillar_type),
                    pillar_type.order(),
                    now,
                ],
            )?;
        }
        drop(conn);

        self.get(&id)?
            .ok_or_else(|| AppError::database("strategy vanished after insert"))
    }

    /// Fetch a strategy by id
    pub fn get(&self, id: &str) -> AppResult<Option<Strategy>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, user_id, brand_name, sector, phase, status, record_state,
                    node_type, parent_id, coherence_score, interview_data,
                    created_at, updated_at
             FROM strategies WHERE id = ?1",
            params![id],
            row_to_strategy,
        )
        .optional()
        .map_err(AppError::from)
    }

    /// Fetch a strategy the given user owns.
    ///
    /// A missing record and an ownership mismatch produce the same
    /// `NotFound` error.
    pub fn get_owned(&self, id: &str, user_id: &str) -> AppResult<Strategy> {
        match self.get(id)? {
            Some(strategy) if strategy.user_id == user_id => Ok(strategy),
            _ => Err(AppError::not_found(format!("Strategy not found: {}", id))),
        }
    }

    /// Child brand nodes of a strategy
    pub fn get_children(&self, parent_id: &str) -> AppResult<Vec<Strategy>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, brand_name, sector, phase, status, record_state,
                    node_type, parent_id, coherence_score, interview_data,
                    created_at, updated_at
             FROM strategies WHERE parent_id = ?1 ORDER BY created_at",
        )?;
        let rows = stmt.query_map(params![parent_id], row_to_strategy)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    /// Replace the interview-data blob
    pub fn update_interview_data(&self, id: &str, data: &InterviewData) -> AppResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE strategies SET interview_data = ?1, updated_at = ?2 WHERE id = ?3",
            params![data.to_json()?, Utc::now().to_rfc3339(), id],
        )?;
        if affected == 0 {
            return Err(AppError::not_found(format!("Strategy not found: {}", id)));
        }
        Ok(())
    }

    /// Advance phase only if the strategy is currently in `required`.
    ///
    /// Returns whether the conditional update applied. The guard runs
    /// inside the UPDATE itself so a stale in-process read can never
    /// advance a strategy twice.
    pub fn advance_phase_if(
        &self,
        id: &str,
        required: StrategyPhase,
        next: StrategyPhase,
        status: StrategyStatus,
    ) -> AppResult<bool> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE strategies SET phase = ?1, status = ?2, updated_at = ?3
             WHERE id = ?4 AND phase = ?5",
            params![
                next.as_str(),
                status.as_str(),
                Utc::now().to_rfc3339(),
                id,
                required.as_str(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Administrative phase reset
    pub fn set_phase(&self, id: &str, phase: StrategyPhase) -> AppResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE strategies SET phase = ?1, updated_at = ?2 WHERE id = ?3",
            params![phase.as_str(), Utc::now().to_rfc3339(), id],
        )?;
        if affected == 0 {
            return Err(AppError::not_found(format!("Strategy not found: {}", id)));
        }
        Ok(())
    }

    /// Update the generation status
    pub fn set_status(&self, id: &str, status: StrategyStatus) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE strategies SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), id],
        )?;
        Ok(())
    }

    /// Update the archival side-status
    pub fn set_record_state(&self, id: &str, state: RecordState) -> AppResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE strategies SET record_state = ?1, updated_at = ?2 WHERE id = ?3",
            params![state.as_str(), Utc::now().to_rfc3339(), id],
        )?;
        if affected == 0 {
            return Err(AppError::not_found(format!("Strategy not found: {}", id)));
        }
        Ok(())
    }

    /// All pillars of a strategy, in display order
    pub fn load_pillars(&self, strategy_id: &str) -> AppResult<Vec<Pillar>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, strategy_id, pillar_type, status, content, title, sort_order,
                    created_at, updated_at
             FROM pillars WHERE strategy_id = ?1 ORDER BY sort_order",
        )?;
        let rows = stmt.query_map(params![strategy_id], row_to_pillar)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
    }

    /// Set a pillar's content and status
    pub fn set_pillar_content(
        &self,
        pillar_id: &str,
        content: &str,
        status: PillarStatus,
    ) -> AppResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE pillars SET content = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            params![content, status.as_str(), Utc::now().to_rfc3339(), pillar_id],
        )?;
        if affected == 0 {
            return Err(AppError::not_found(format!("Pillar not found: {}", pillar_id)));
        }
        Ok(())
    }
}

fn row_to_strategy(row: &Row<'_>) -> rusqlite::Result<Strategy> {
    let phase_raw: String = row.get(4)?;
    let phase = StrategyPhase::from_str(&phase_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown phase '{}'", phase_raw).into(),
        )
    })?;

    let status_raw: String = row.get(5)?;
    let record_state_raw: String = row.get(6)?;
    let node_type_raw: String = row.get(7)?;
    let interview_raw: String = row.get(10)?;
    let interview_data = InterviewData::from_json(&interview_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            10,
            rusqlite::types::Type::Text,
            e.to_string().into(),
        )
    })?;

    Ok(Strategy {
        id: row.get(0)?,
        user_id: row.get(1)?,
        brand_name: row.get(2)?,
        sector: row.get(3)?,
        phase,
        status: StrategyStatus::from_str(&status_raw),
        record_state: RecordState::from_str(&record_state_raw),
        node_type: NodeType::from_str(&node_type_raw),
        parent_id: row.get(8)?,
        coherence_score: row.get(9)?,
        interview_data,
        created_at: row.get(11).unwrap_or_default(),
        updated_at: row.get(12).unwrap_or_default(),
    })
}

fn row_to_pillar(row: &Row<'_>) -> rusqlite::Result<Pillar> {
    let type_raw: String = row.get(2)?;
    let pillar_type = PillarType::from_str(&type_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown pillar type '{}'", type_raw).into(),
        )
    })?;
    let status_raw: String = row.get(3)?;

    Ok(Pillar {
        id: row.get(0)?,
        strategy_id: row.get(1)?,
        pillar_type,
        status: PillarStatus::from_str(&status_raw),
        content: row.get(4)?,
        title: row.get(5)?,
        sort_order: row.get(6)?,
        created_at: row.get(7).unwrap_or_default(),
        updated_at: row.get(8).unwrap_or_default(),
    })
}
