use super::openai_compat::OpenAiCompatProvider;
use super::{ProviderAdapter, ProviderKind};
use crate::config::FileProvidersConfig;
use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use roundtable_domain::Model;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct RoutingGateway {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    /// Model name → index into `providers`, from `[providers.routing]`
    explicit_model_routing: HashMap<String, usize>,
    default_kind: ProviderKind,
}

impl RoutingGateway {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>, config: &FileProvidersConfig) -> Self {
        let mut explicit_model_routing = HashMap::new();

        for (model_name, provider_name) in &config.routing {
            let Ok(target_kind) = provider_name.parse::<ProviderKind>() else {
                warn!(model = %model_name, "Ignoring route to unknown provider '{}'", provider_name);
                continue;
            };
            if let Some(idx) = providers.iter().position(|p| p.kind() == target_kind) {
                explicit_model_routing.insert(model_name.clone(), idx);
            }
        }

        let default_kind = config
            .default
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default();

        Self {
            providers,
            explicit_model_routing,
            default_kind,
        }
    }

    /// One OpenAI-compatible provider per configured section.
    pub fn from_config(config: &FileProvidersConfig) -> Self {
        let providers: Vec<Arc<dyn ProviderAdapter>> = ProviderKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let section = config.get(kind.as_str())?;
                Some(Arc::new(OpenAiCompatProvider::from_config(kind, section))
                    as Arc<dyn ProviderAdapter>)
            })
            .collect();
        Self::new(providers, config)
    }

    /// Routing priority:
    ///  1. explicit `[providers.routing]` entry for the model
    ///  2. the provider of the model's family
    ///  3. the configured default provider
    ///  4. the first registered provider
    fn resolve_provider(&self, model: &Model) -> Result<&dyn ProviderAdapter, GatewayError> {
        if let Some(&idx) = self.explicit_model_routing.get(model.as_str()) {
            return Ok(self.providers[idx].as_ref());
        }

        if let Some(kind) = ProviderKind::for_model(model)
            && let Some(p) = self.providers.iter().find(|p| p.kind() == kind)
        {
            return Ok(p.as_ref());
        }

        if let Some(p) = self
            .providers
            .iter()
            .find(|p| p.kind() == self.default_kind)
        {
            return Ok(p.as_ref());
        }

        self.providers
            .first()
            .map(|p| p.as_ref())
            .ok_or(GatewayError::ModelNotAvailable(
                "No providers available".to_string(),
            ))
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn create_session(&self, model: &Model) -> Result<Box<dyn LlmSession>, GatewayError> {
        let provider = self.resolve_provider(model)?;
        debug!(model = %model, provider = %provider.kind(), "Routed model");
        provider.create_session(model).await
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        let provider = self.resolve_provider(model)?;
        debug!(model = %model, provider = %provider.kind(), "Routed model");
        provider
            .create_session_with_system_prompt(model, system_prompt)
            .await
    }

    async fn available_models(&self) -> Result<Vec<Model>, GatewayError> {
        let mut all_models = Vec::new();
        for provider in &self.providers {
            if let Ok(models) = provider.available_models().await {
                all_models.extend(models);
            }
        }
        Ok(all_models)
    }
}
