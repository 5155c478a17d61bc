//! Advertis core
//!
//! Backend core for a multi-tenant brand-strategy pipeline: strategies
//! progress through a fixed phase sequence, an AI provider fills the
//! brand interview without overwriting user input, and internal
//! methodology labels are transposed to client vocabulary per role.

pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use state::AppState;
pub use utils::error::{AppError, AppResult};
