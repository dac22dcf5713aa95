//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Every section is optional and
//! falls back to its defaults; [`FileConfig::validate`] rejects values the
//! defaults could never produce.

mod game;
mod output;
mod pipeline;
mod providers;
mod tools;

pub use game::{FileGameConfig, FilePlayerConfig};
pub use output::FileOutputConfig;
pub use pipeline::FilePipelineConfig;
pub use providers::{FileProviderConfig, FileProvidersConfig, PROVIDER_NAMES};
pub use tools::FileToolsConfig;

use roundtable_application::{ExecutionParams, GameParams};
use roundtable_domain::{TerminationPolicy, VoteRule};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    InvalidTimeout(&'static str),

    #[error("game.max_rounds must be at least 1")]
    InvalidMaxRounds,

    #[error("model name cannot be empty ({0})")]
    EmptyModelName(String),

    #[error("player name cannot be empty")]
    EmptyPlayerName,

    #[error("{field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("{field}: unknown provider '{name}'")]
    UnknownProvider { field: String, name: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Endpoints, keys and model routing
    pub providers: FileProvidersConfig,
    /// Odd-one-out game settings
    pub game: FileGameConfig,
    /// Researcher/analyst settings
    pub pipeline: FilePipelineConfig,
    /// Capability settings
    pub tools: FileToolsConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let timeouts = [
            ("game.turn_timeout_seconds", self.game.turn_timeout_seconds),
            ("game.session_timeout_seconds", self.game.session_timeout_seconds),
            ("pipeline.call_timeout_seconds", self.pipeline.call_timeout_seconds),
            ("tools.http_timeout_seconds", Some(self.tools.http_timeout_seconds)),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, t)| *t == Some(0)) {
            return Err(ConfigValidationError::InvalidTimeout(field));
        }

        if self.game.max_rounds == 0 {
            return Err(ConfigValidationError::InvalidMaxRounds);
        }

        for player in &self.game.players {
            if player.name.trim().is_empty() {
                return Err(ConfigValidationError::EmptyPlayerName);
            }
            if player.model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName(format!(
                    "game.players[{}]",
                    player.name
                )));
            }
        }

        let models = [
            ("pipeline.researcher_model", &self.pipeline.researcher_model),
            ("pipeline.analyst_model", &self.pipeline.analyst_model),
            ("tools.perplexity_model", &self.tools.perplexity_model),
        ];
        if let Some((field, _)) = models.iter().find(|(_, m)| m.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyModelName(field.to_string()));
        }

        self.vote_rule()?;
        self.termination()?;

        if let Some(name) = &self.providers.default
            && !PROVIDER_NAMES.contains(&name.as_str())
        {
            return Err(ConfigValidationError::UnknownProvider {
                field: "providers.default".to_string(),
                name: name.clone(),
            });
        }
        for (model, name) in &self.providers.routing {
            if !PROVIDER_NAMES.contains(&name.as_str()) {
                return Err(ConfigValidationError::UnknownProvider {
                    field: format!("providers.routing.\"{}\"", model),
                    name: name.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn vote_rule(&self) -> Result<VoteRule, ConfigValidationError> {
        self.game
            .vote_rule
            .parse()
            .map_err(|message| ConfigValidationError::InvalidValue {
                field: "game.vote_rule",
                message,
            })
    }

    pub fn termination(&self) -> Result<TerminationPolicy, ConfigValidationError> {
        self.game
            .termination
            .parse()
            .map_err(|message| ConfigValidationError::InvalidValue {
                field: "game.termination",
                message,
            })
    }

    /// Coordinator parameters from the `[game]` section.
    pub fn game_params(&self) -> Result<GameParams, ConfigValidationError> {
        Ok(GameParams::default()
            .with_retries(self.game.retries)
            .with_vote_rule(self.vote_rule()?)
            .with_termination(self.termination()?)
            .with_turn_timeout(self.game.turn_timeout_seconds.map(Duration::from_secs))
            .with_session_timeout(self.game.session_timeout_seconds.map(Duration::from_secs))
            .with_seed(self.game.seed)
            .with_history_window(self.game.history_window))
    }

    /// Actor parameters for the pipeline roles.
    pub fn pipeline_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_tool_turns(self.pipeline.max_tool_turns)
            .with_call_timeout(self.pipeline.call_timeout_seconds.map(Duration::from_secs))
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.tools.http_timeout_seconds)
    }
}
