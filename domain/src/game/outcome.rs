//! How a game ended, and everything the coordinator hands back.

use super::assignment::Assignment;
use super::round::Round;
use super::session::SessionId;
use super::violation::ProtocolViolation;
use crate::context::ContextLog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameOutcome {
    /// Every odd-one-out holder was named by the vote rule.
    MajorityWins,
    /// The judge ruled the success criterion met.
    CriterionMet,
    /// Round limit reached without a decision.
    Inconclusive,
    /// Ended early (cancellation, timeout, every participant failing).
    Aborted { reason: String },
}

impl GameOutcome {
    pub fn aborted(reason: impl Into<String>) -> Self {
        GameOutcome::Aborted {
            reason: reason.into(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            GameOutcome::MajorityWins => "Majority wins".to_string(),
            GameOutcome::CriterionMet => "Success criterion met".to_string(),
            GameOutcome::Inconclusive => "inconclusive".to_string(),
            GameOutcome::Aborted { reason } => format!("aborted: {}", reason),
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, GameOutcome::Aborted { .. })
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Final result of one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub session_id: SessionId,
    pub outcome: GameOutcome,
    pub rounds: Vec<Round>,
    pub log: ContextLog,
    /// Full word mapping, revealed at conclusion. `None` when the session
    /// was aborted before words were assigned.
    pub assignment: Option<Assignment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ProtocolViolation>,
}

impl GameResult {
    pub fn rounds_played(&self) -> usize {
        self.rounds.len()
    }

    pub fn last_round(&self) -> Option<&Round> {
        self.rounds.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(GameOutcome::MajorityWins.to_string(), "Majority wins");
        assert_eq!(GameOutcome::CriterionMet.to_string(), "Success criterion met");
        assert_eq!(GameOutcome::Inconclusive.to_string(), "inconclusive");
        assert_eq!(
            GameOutcome::aborted("cancelled").to_string(),
            "aborted: cancelled"
        );
        assert!(GameOutcome::aborted("x").is_aborted());
    }

    #[test]
    fn test_outcome_serde_shape() {
        let json = serde_json::to_value(GameOutcome::aborted("session timed out")).unwrap();
        assert_eq!(json["outcome"], "aborted");
        assert_eq!(json["reason"], "session timed out");
    }
}
