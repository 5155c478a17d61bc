//! Generation Provider Module
//!
//! Narrow interface to the generation model: prompt in, text out,
//! classified error out. One concrete HTTP implementation; tests use a
//! scripted mock behind the same trait.

pub mod extraction;
pub mod http;
pub mod provider;
pub mod types;

pub use extraction::{extract_variable_map, strip_code_fence};
pub use http::HttpGenerationProvider;
pub use provider::GenerationProvider;
pub use types::*;
