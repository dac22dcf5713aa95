//! Actor implementations.

pub mod llm_actor;
mod tool_helpers;

pub use llm_actor::LlmActor;
