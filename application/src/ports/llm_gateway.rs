//! LLM Gateway port
//!
//! Defines the interface for communicating with hosted model providers.

use async_trait::async_trait;
use roundtable_domain::Model;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Missing API key for provider {provider} (set {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Configuration problems are not worth retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingApiKey { .. } | GatewayError::ModelNotAvailable(_)
        )
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with the specified model
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Models this gateway can route
    async fn available_models(&self) -> Result<Vec<Model>, GatewayError>;
}

/// An active LLM session
///
/// Sessions keep their own message history: each `send` sees every earlier
/// exchange of the same session.
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model used by this session
    fn model(&self) -> &Model;

    /// Send a message and get a response
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
