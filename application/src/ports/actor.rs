//! Actor port: the polymorphic participant interface.
//!
//! Every seat at the table, the referee, and both pipeline roles are actors.
//! One backend or variant per implementation; the coordinator only ever
//! calls [`Actor::act`].

use super::llm_gateway::GatewayError;
use async_trait::async_trait;
use roundtable_domain::{CapabilityInvocation, Citation, Phase};
use std::time::Duration;
use thiserror::Error;

/// Errors an actor can return (the capability error class)
#[derive(Error, Debug)]
pub enum ActError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Actor failed: {0}")]
    Failed(String),
}

impl ActError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ActError::Gateway(e) => !e.is_configuration(),
            ActError::EmptyResponse | ActError::Timeout(_) | ActError::Failed(_) => true,
        }
    }
}

/// What an actor is asked to do
#[derive(Debug, Clone)]
pub struct ActContext {
    /// The user message: public history plus the request
    pub prompt: String,
    /// Stage the request belongs to
    pub phase: Phase,
}

impl ActContext {
    pub fn new(prompt: impl Into<String>, phase: Phase) -> Self {
        Self {
            prompt: prompt.into(),
            phase,
        }
    }
}

/// What an actor produced
#[derive(Debug, Clone, Default)]
pub struct ActOutput {
    pub content: String,
    /// Capability calls made while producing `content`, in issue order
    pub invocations: Vec<CapabilityInvocation>,
    /// Sources reported by capabilities or cited in the content
    pub citations: Vec<Citation>,
}

impl ActOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Actor: Send + Sync {
    /// Display name (participant id or role)
    fn name(&self) -> &str;

    async fn act(&self, ctx: &ActContext) -> Result<ActOutput, ActError>;
}
