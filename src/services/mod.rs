//! Service layer: domain logic over the storage layer

pub mod autofill;
pub mod interview;
pub mod llm;
pub mod mapping;
pub mod phase;
pub mod role;
pub mod whitelabel;
