//! Storage layer: pooled SQLite database and per-aggregate stores

pub mod database;
pub mod market_study_store;
pub mod strategy_store;

pub use database::{Database, DbPool};
pub use market_study_store::MarketStudyStore;
pub use strategy_store::{NewStrategy, StrategyStore};
