//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod history;
pub mod logging;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use history::{FileHistoryStore, InMemoryHistoryStore};
pub use logging::JsonlConversationLogger;
pub use providers::{ProviderKind, openai_compat::OpenAiCompatProvider, routing::RoutingGateway};
pub use tools::{
    AnswerEngine, DEFAULT_HTTP_TIMEOUT, LocalCapabilityExecutor, analysis_tool_spec,
    research_tool_spec,
};
