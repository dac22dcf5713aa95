//! Post-hoc protocol checks.
//!
//! Nothing here is enforced: an inference-backed participant cannot be forced
//! to comply, so violations are recorded and reported, never corrected.

use super::participant::{ParticipantId, Roster};
use super::round::Round;
use super::text::contains_whole_word;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProtocolViolation {
    /// A turn contained the speaker's own private word.
    LeakedPrivateValue {
        participant: ParticipantId,
        round: u32,
    },
    /// A round reached evaluation without a full set of entries.
    IncompleteRound {
        round: u32,
        missing: Vec<ParticipantId>,
    },
}

impl ProtocolViolation {
    pub fn round(&self) -> u32 {
        match self {
            ProtocolViolation::LeakedPrivateValue { round, .. } => *round,
            ProtocolViolation::IncompleteRound { round, .. } => *round,
        }
    }
}

impl std::fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolViolation::LeakedPrivateValue { participant, round } => {
                write!(f, "round {}: {} revealed its word", round, participant)
            }
            ProtocolViolation::IncompleteRound { round, missing } => {
                let names: Vec<_> = missing.iter().map(|m| m.as_str()).collect();
                write!(f, "round {}: missing entries from {}", round, names.join(", "))
            }
        }
    }
}

/// Best-effort leak check: the private word appears as a whole word,
/// ignoring case.
pub fn detect_leak(
    participant: &ParticipantId,
    round: u32,
    content: &str,
    private_value: &str,
) -> Option<ProtocolViolation> {
    contains_whole_word(content, private_value).then(|| ProtocolViolation::LeakedPrivateValue {
        participant: participant.clone(),
        round,
    })
}

/// Audit a round before it is tallied.
pub fn audit_round(round: &Round, roster: &Roster) -> Option<ProtocolViolation> {
    if round.is_complete(roster) {
        return None;
    }
    Some(ProtocolViolation::IncompleteRound {
        round: round.number,
        missing: round.missing(roster),
    })
}
