//! Hosted model providers
//!
//! Every provider speaks the OpenAI chat completions dialect, so one adapter
//! type serves them all; [`routing::RoutingGateway`] picks the provider for
//! each model.

pub mod openai_compat;
pub mod routing;

use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmSession};
use roundtable_domain::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    DeepSeek,
    OpenRouter,
    Gemini,
    Perplexity,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::DeepSeek,
        ProviderKind::OpenRouter,
        ProviderKind::Gemini,
        ProviderKind::Perplexity,
    ];

    /// Name used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Perplexity => "perplexity",
        }
    }

    /// Provider a model family belongs to, if it has an obvious one.
    pub fn for_model(model: &Model) -> Option<Self> {
        if model.is_openrouter() {
            Some(ProviderKind::OpenRouter)
        } else if model.is_deepseek() {
            Some(ProviderKind::DeepSeek)
        } else if model.is_openai() {
            Some(ProviderKind::OpenAi)
        } else if model.is_gemini() {
            Some(ProviderKind::Gemini)
        } else if model.is_perplexity() {
            Some(ProviderKind::Perplexity)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.as_str() == name)
            .ok_or_else(|| format!("Unknown provider: {}", s))
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;
    fn supports_model(&self, model: &Model) -> bool;
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError>;
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
    async fn available_models(&self) -> Result<Vec<Model>, GatewayError>;
}
