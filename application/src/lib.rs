//! Application layer for roundtable
//!
//! This crate contains the coordinator and pipeline use cases, the actor
//! implementation, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::LlmActor;
pub use config::{ExecutionParams, GameParams};
pub use ports::{
    actor::{ActContext, ActError, ActOutput, Actor},
    capability::CapabilityPort,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history_store::{HistoryError, HistoryStore, NoHistory},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_game::{RunGameError, RunGameInput, RunGameUseCase};
pub use use_cases::run_pipeline::{RunPipelineError, RunPipelineUseCase};
