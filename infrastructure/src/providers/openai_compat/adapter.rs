use super::session::OpenAiCompatSession;
use crate::config::FileProviderConfig;
use crate::providers::{ProviderAdapter, ProviderKind};
use crate::tools::http::build_client;
use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmSession};
use roundtable_domain::Model;
use std::time::Duration;
use tracing::debug;

/// Generous transport limit; callers apply their own per-call timeouts.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Models listed by `available_models`, grouped by provider at query time.
const KNOWN_MODELS: [Model; 9] = [
    Model::DeepSeekChat,
    Model::DeepSeekReasoner,
    Model::Gpt4o,
    Model::Gpt4oMini,
    Model::O3Mini,
    Model::Gemini20Flash,
    Model::SonarPro,
    Model::Sonar,
    Model::OpenRouterGeminiFlash,
];

pub struct OpenAiCompatProvider {
    kind: ProviderKind,
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
    max_tokens: u32,
}

impl OpenAiCompatProvider {
    pub fn from_config(kind: ProviderKind, config: &FileProviderConfig) -> Self {
        Self {
            kind,
            client: build_client(REQUEST_TIMEOUT),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            api_key_env: config.api_key_env.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Whether a key was found; providers without one still route, but
    /// fail at session creation.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn open(
        &self,
        model: &Model,
        system_prompt: Option<&str>,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| GatewayError::MissingApiKey {
                provider: self.kind.to_string(),
                env_var: self.api_key_env.clone(),
            })?;

        debug!(provider = %self.kind, model = %model, "Opening session");
        Ok(Box::new(OpenAiCompatSession::new(
            self.client.clone(),
            self.kind,
            self.endpoint(),
            api_key,
            model.clone(),
            self.max_tokens,
            system_prompt,
        )))
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn supports_model(&self, model: &Model) -> bool {
        ProviderKind::for_model(model) == Some(self.kind)
    }

    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.open(model, None)
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.open(model, Some(system_prompt))
    }

    async fn available_models(&self) -> Result<Vec<Model>, GatewayError> {
        Ok(KNOWN_MODELS
            .iter()
            .filter(|m| self.supports_model(m))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(kind: ProviderKind, api_key: Option<&str>) -> OpenAiCompatProvider {
        let config = FileProviderConfig {
            api_key: api_key.map(String::from),
            api_key_env: "ROUNDTABLE_TEST_NEVER_SET".to_string(),
            base_url: "https://api.deepseek.com/".to_string(),
            max_tokens: 1024,
        };
        OpenAiCompatProvider::from_config(kind, &config)
    }

    #[tokio::test]
    async fn test_missing_key_fails_at_session_creation() {
        let p = provider(ProviderKind::DeepSeek, None);
        assert!(!p.has_api_key());

        let err = p
            .create_session_with_system_prompt(&Model::DeepSeekChat, "rules")
            .await
            .err()
            .unwrap();
        match err {
            GatewayError::MissingApiKey {
                ref provider,
                ref env_var,
            } => {
                assert_eq!(provider, "deepseek");
                assert_eq!(env_var, "ROUNDTABLE_TEST_NEVER_SET");
            }
            ref other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_session_with_key() {
        let p = provider(ProviderKind::DeepSeek, Some("sk-test"));
        let session = p.create_session(&Model::DeepSeekChat).await.unwrap();
        assert_eq!(session.model(), &Model::DeepSeekChat);
        assert_eq!(p.endpoint(), "https://api.deepseek.com/chat/completions");
    }

    #[tokio::test]
    async fn test_available_models_per_provider() {
        let models = provider(ProviderKind::OpenAi, None)
            .available_models()
            .await
            .unwrap();
        assert_eq!(models, vec![Model::Gpt4o, Model::Gpt4oMini, Model::O3Mini]);
    }
}
