//! Game configuration from TOML (`[game]` section)

use roundtable_domain::{Model, ParticipantId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePlayerConfig {
    pub name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGameConfig {
    /// Seats in turn order
    pub players: Vec<FilePlayerConfig>,
    /// Referee for the success criterion; empty disables judging
    pub judge_model: Option<String>,
    /// Success criterion given to the judge
    pub criterion: Option<String>,
    pub max_rounds: u32,
    /// `majority`, `unanimous`, `atleast:N` or `N%`
    pub vote_rule: String,
    /// Extra attempts per turn and vote
    pub retries: u8,
    /// `majority_first` or `criterion_first`
    pub termination: String,
    pub turn_timeout_seconds: Option<u64>,
    pub session_timeout_seconds: Option<u64>,
    /// Seed for seat assignment
    pub seed: Option<u64>,
    /// Where session logs are kept (defaults to the platform data dir)
    pub history_dir: Option<PathBuf>,
    /// Earlier utterances replayed when a stored session is resumed
    pub history_window: usize,
}

impl Default for FileGameConfig {
    fn default() -> Self {
        Self {
            players: Model::default_players()
                .into_iter()
                .enumerate()
                .map(|(i, model)| FilePlayerConfig {
                    name: format!("Agent {}", i + 1),
                    model: model.to_string(),
                })
                .collect(),
            judge_model: Some(Model::default_judge().to_string()),
            criterion: None,
            max_rounds: 3,
            vote_rule: "majority".to_string(),
            retries: 1,
            termination: "majority_first".to_string(),
            turn_timeout_seconds: Some(180),
            session_timeout_seconds: None,
            seed: None,
            history_dir: None,
            history_window: 3,
        }
    }
}

impl FileGameConfig {
    /// Players as (seat id, model) pairs.
    pub fn seats(&self) -> Vec<(ParticipantId, Model)> {
        self.players
            .iter()
            .map(|p| (ParticipantId::new(p.name.trim()), parse_model(&p.model)))
            .collect()
    }

    /// The judge model, unless disabled with an empty string.
    pub fn judge(&self) -> Option<Model> {
        self.judge_model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(parse_model)
    }
}

pub(crate) fn parse_model(name: &str) -> Model {
    let Ok(model) = name.parse::<Model>();
    model
}
