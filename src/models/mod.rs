//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod market_study;
pub mod pillar;
pub mod response;
pub mod strategy;

pub use market_study::*;
pub use pillar::*;
pub use response::*;
pub use strategy::*;
