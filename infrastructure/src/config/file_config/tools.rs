//! Capability configuration from TOML (`[tools]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Model behind `answer_search` (served by the `perplexity` provider)
    pub perplexity_model: String,
    /// Per-request timeout for every capability HTTP call
    pub http_timeout_seconds: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            perplexity_model: "sonar-pro".to_string(),
            http_timeout_seconds: 30,
        }
    }
}
