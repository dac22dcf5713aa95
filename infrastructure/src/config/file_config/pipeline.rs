//! Research/decision pipeline configuration from TOML (`[pipeline]` section)

use super::game::parse_model;
use roundtable_domain::Model;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    pub researcher_model: String,
    pub analyst_model: String,
    /// Tool exchanges allowed per role
    pub max_tool_turns: usize,
    /// Per-role time limit
    pub call_timeout_seconds: Option<u64>,
}

impl Default for FilePipelineConfig {
    fn default() -> Self {
        Self {
            researcher_model: Model::Gemini20Flash.to_string(),
            analyst_model: Model::Gemini20Flash.to_string(),
            max_tool_turns: 4,
            call_timeout_seconds: Some(300),
        }
    }
}

impl FilePipelineConfig {
    pub fn researcher(&self) -> Model {
        parse_model(&self.researcher_model)
    }

    pub fn analyst(&self) -> Model {
        parse_model(&self.analyst_model)
    }
}
