//! Game parameters: coordinator loop control.

use roundtable_domain::{TerminationPolicy, VoteRule};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Coordinator parameters.
///
/// Everything that shapes a session but is not part of its input (roster,
/// candidates, criterion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParams {
    /// Extra attempts per participant call after the first one fails.
    pub retries: u8,
    /// Rule applied to each odd-one-out holder's ballot count.
    pub vote_rule: VoteRule,
    /// Order of the majority and criterion checks.
    pub termination: TerminationPolicy,
    /// Timeout for one participant call (turn, vote, verdict).
    pub turn_timeout: Option<Duration>,
    /// Deadline for the whole session.
    pub session_timeout: Option<Duration>,
    /// Seed for the seat assignment RNG; random when `None`.
    pub seed: Option<u64>,
    /// Utterances from earlier runs of a resumed session shown to players.
    pub history_window: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            retries: 1,
            vote_rule: VoteRule::Majority,
            termination: TerminationPolicy::MajorityFirst,
            turn_timeout: Some(Duration::from_secs(180)),
            session_timeout: None,
            seed: None,
            history_window: 3,
        }
    }
}

impl GameParams {
    /// Total attempts per participant call.
    pub fn attempts(&self) -> u8 {
        self.retries.saturating_add(1)
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_vote_rule(mut self, rule: VoteRule) -> Self {
        self.vote_rule = rule;
        self
    }

    pub fn with_termination(mut self, policy: TerminationPolicy) -> Self {
        self.termination = policy;
        self
    }

    pub fn with_turn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.session_timeout = timeout;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }
}
