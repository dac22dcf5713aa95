//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provider names accepted by `default` and the routing table.
pub const PROVIDER_NAMES: [&str; 5] = ["openai", "deepseek", "openrouter", "gemini", "perplexity"];

/// One OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    /// Base URL, `/chat/completions` is appended.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl FileProviderConfig {
    fn new(api_key_env: &str, base_url: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
            max_tokens: 4096,
        }
    }

    /// The inline key if set, otherwise the env var's value.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self::new("OPENAI_API_KEY", "https://api.openai.com/v1")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider used when neither routing nor the model family decides.
    pub default: Option<String>,
    pub openai: FileProviderConfig,
    pub deepseek: FileProviderConfig,
    pub openrouter: FileProviderConfig,
    pub gemini: FileProviderConfig,
    pub perplexity: FileProviderConfig,
    /// Explicit model → provider overrides.
    pub routing: HashMap<String, String>,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            default: None,
            openai: FileProviderConfig::default(),
            deepseek: FileProviderConfig::new("DEEPSEEK_API_KEY", "https://api.deepseek.com"),
            openrouter: FileProviderConfig::new(
                "OPENROUTER_API_KEY",
                "https://openrouter.ai/api/v1",
            ),
            gemini: FileProviderConfig::new(
                "GEMINI_API_KEY",
                "https://generativelanguage.googleapis.com/v1beta/openai",
            ),
            perplexity: FileProviderConfig::new("PERPLEXITY_API_KEY", "https://api.perplexity.ai"),
            routing: HashMap::new(),
        }
    }
}

impl FileProvidersConfig {
    /// Settings for a provider by name.
    pub fn get(&self, name: &str) -> Option<&FileProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "deepseek" => Some(&self.deepseek),
            "openrouter" => Some(&self.openrouter),
            "gemini" => Some(&self.gemini),
            "perplexity" => Some(&self.perplexity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_key_wins_over_env() {
        let config = FileProviderConfig {
            api_key: Some("sk-inline".to_string()),
            api_key_env: "ROUNDTABLE_TEST_UNSET_KEY_1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = FileProviderConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "ROUNDTABLE_TEST_UNSET_KEY_2".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[deepseek]
max_tokens = 1024

[routing]
"gpt-4o" = "openrouter"
"#,
        )
        .unwrap();
        assert_eq!(config.deepseek.max_tokens, 1024);
        assert_eq!(config.deepseek.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.routing["gpt-4o"], "openrouter");
        assert_eq!(config.get("perplexity").unwrap().base_url, "https://api.perplexity.ai");
        assert!(config.get("bedrock").is_none());
    }
}
