//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod actor;
pub mod capability;
pub mod conversation_logger;
pub mod history_store;
pub mod llm_gateway;
pub mod progress;
