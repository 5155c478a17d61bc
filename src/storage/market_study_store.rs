//! Market Study Store
//!
//! One market-study record per strategy. File and manual entries live in
//! JSON TEXT columns and are rewritten whole on every mutation, which
//! keeps each append or removal atomic at the record level.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::market_study::{ManualEntry, MarketStudy, MarketStudyStatus, UploadedFile};
use crate::storage::database::DbPool;
use crate::utils::error::{AppError, AppResult};

/// Manages market-study persistence
#[derive(Clone)]
pub struct MarketStudyStore {
    pool: DbPool,
}

impl MarketStudyStore {
    /// Create a new store with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<r2d2_sqlite::SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Fetch the study for a strategy
    pub fn get_by_strategy(&self, strategy_id: &str) -> AppResult<Option<MarketStudy>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, strategy_id, status, uploaded_files, manual_data,
                    created_at, updated_at
             FROM market_studies WHERE strategy_id = ?1",
            params![strategy_id],
            row_to_study,
        )
        .optional()
        .map_err(AppError::from)
    }

    /// Fetch the study for a strategy, creating a pending record if none
    /// exists yet
    pub fn get_or_create(&self, strategy_id: &str) -> AppResult<MarketStudy> {
        if let Some(study) = self.get_by_strategy(strategy_id)? {
            return Ok(study);
        }

        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        // UNIQUE(strategy_id) makes a racing insert lose cleanly.
        conn.execute(
            "INSERT OR IGNORE INTO market_studies
             (id, strategy_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![
                Uuid::new_v4().to_string(),
                strategy_id,
                MarketStudyStatus::Pending.as_str(),
                now,
            ],
        )?;
        drop(conn);

        self.get_by_strategy(strategy_id)?
            .ok_or_else(|| AppError::database("market study vanished after insert"))
    }

    /// Update the lifecycle status
    pub fn set_status(&self, strategy_id: &str, status: MarketStudyStatus) -> AppResult<()> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE market_studies SET status = ?1, updated_at = ?2 WHERE strategy_id = ?3",
            params![status.as_str(), Utc::now().to_rfc3339(), strategy_id],
        )?;
        if affected == 0 {
            return Err(AppError::not_found(format!(
                "Market study not found for strategy: {}",
                strategy_id
            )));
        }
        Ok(())
    }

    /// Append a parsed uploaded file
    pub fn add_uploaded_file(
        &self,
        strategy_id: &str,
        file_name: &str,
        content: &str,
    ) -> AppResult<UploadedFile> {
        let mut study = self.get_or_create(strategy_id)?;
        let entry = UploadedFile {
            id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            content: content.to_string(),
            uploaded_at: Utc::now().to_rfc3339(),
        };
        study.uploaded_files.push(entry.clone());
        self.write_uploaded_files(strategy_id, &study.uploaded_files)?;
        Ok(entry)
    }

    /// Append a manual data entry
    pub fn add_manual_entry(
        &self,
        strategy_id: &str,
        category: &str,
        content: &str,
    ) -> AppResult<ManualEntry> {
        let mut study = self.get_or_create(strategy_id)?;
        let entry = ManualEntry {
            id: Uuid::new_v4().to_string(),
            category: category.to_string(),
            content: content.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        study.manual_data.push(entry.clone());
        self.write_manual_data(strategy_id, &study.manual_data)?;
        Ok(entry)
    }

    /// Remove one manual entry by id
    pub fn remove_manual_entry(&self, strategy_id: &str, entry_id: &str) -> AppResult<()> {
        let mut study = self
            .get_by_strategy(strategy_id)?
            .ok_or_else(|| {
                AppError::not_found(format!("Market study not found for strategy: {}", strategy_id))
            })?;

        let before = study.manual_data.len();
        study.manual_data.retain(|e| e.id != entry_id);
        if study.manual_data.len() == before {
            return Err(AppError::not_found(format!(
                "Manual entry not found: {}",
                entry_id
            )));
        }
        self.write_manual_data(strategy_id, &study.manual_data)
    }

    fn write_uploaded_files(&self, strategy_id: &str, files: &[UploadedFile]) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE market_studies SET uploaded_files = ?1, updated_at = ?2
             WHERE strategy_id = ?3",
            params![
                serde_json::to_string(files)?,
                Utc::now().to_rfc3339(),
                strategy_id
            ],
        )?;
        Ok(())
    }

    fn write_manual_data(&self, strategy_id: &str, entries: &[ManualEntry]) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE market_studies SET manual_data = ?1, updated_at = ?2
             WHERE strategy_id = ?3",
            params![
                serde_json::to_string(entries)?,
                Utc::now().to_rfc3339(),
                strategy_id
            ],
        )?;
        Ok(())
    }
}

fn row_to_study(row: &Row<'_>) -> rusqlite::Result<MarketStudy> {
    let status_raw: String = row.get(2)?;
    let files_raw: String = row.get(3)?;
    let manual_raw: String = row.get(4)?;

    let uploaded_files: Vec<UploadedFile> = serde_json::from_str(&files_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    let manual_data: Vec<ManualEntry> = serde_json::from_str(&manual_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(MarketStudy {
        id: row.get(0)?,
        strategy_id: row.get(1)?,
        status: MarketStudyStatus::from_str(&status_raw),
        uploaded_files,
        manual_data,
        created_at: row.get(5).unwrap_or_default(),
        updated_at: row.get(6).unwrap_or_default(),
    })
}
