//! Coordinator state machine.
//!
//! ```text
//! Init -> Assigning -> RoundInProgress -> Voting -> Evaluating -+-> RoundInProgress
//!                                                               +-> Concluded
//! (any) -> Concluded
//! ```

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    #[default]
    Init,
    Assigning,
    RoundInProgress,
    Voting,
    Evaluating,
    Concluded,
}

impl CoordinatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinatorState::Init => "init",
            CoordinatorState::Assigning => "assigning",
            CoordinatorState::RoundInProgress => "round_in_progress",
            CoordinatorState::Voting => "voting",
            CoordinatorState::Evaluating => "evaluating",
            CoordinatorState::Concluded => "concluded",
        }
    }

    pub fn can_transition_to(&self, next: CoordinatorState) -> bool {
        use CoordinatorState::*;
        match (self, next) {
            (Concluded, _) => false,
            (_, Concluded) => true,
            (Init, Assigning) => true,
            (Assigning, RoundInProgress) => true,
            (RoundInProgress, Voting) => true,
            (Voting, Evaluating) => true,
            (Evaluating, RoundInProgress) => true,
            _ => false,
        }
    }

    pub fn transition(self, next: CoordinatorState) -> Result<CoordinatorState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CoordinatorState::Concluded)
    }
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
