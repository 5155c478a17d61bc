//! Integration Tests Module
//!
//! End-to-end tests over the public crate API. Every test runs against an
//! in-memory SQLite database via Database::new_in_memory(); generation
//! providers are scripted, no network calls are made.

// Phase progression and market-study lifecycle tests
mod phase_test;

// AI interview auto-fill pipeline tests
mod autofill_test;

// Role capabilities and white-label projection tests
mod projection_test;
