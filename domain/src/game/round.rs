//! Rounds: one turn per participant followed by one vote per participant.

use super::participant::{ParticipantId, Roster};
use super::turn::Turn;
use super::vote::{Tally, Vote};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-indexed round number
    pub number: u32,
    pub turns: Vec<Turn>,
    pub votes: Vec<Vote>,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            turns: Vec::new(),
            votes: Vec::new(),
        }
    }

    pub fn has_turn_from(&self, id: &ParticipantId) -> bool {
        self.turns.iter().any(|t| &t.speaker == id)
    }

    pub fn has_vote_from(&self, id: &ParticipantId) -> bool {
        self.votes.iter().any(|v| &v.voter == id)
    }

    /// Roster members without both a turn and a vote in this round.
    pub fn missing(&self, roster: &Roster) -> Vec<ParticipantId> {
        roster
            .ids()
            .filter(|id| !self.has_turn_from(id) || !self.has_vote_from(id))
            .cloned()
            .collect()
    }

    /// Exactly one turn and one vote (possibly null) per roster member.
    pub fn is_complete(&self, roster: &Roster) -> bool {
        self.turns.len() == roster.len()
            && self.votes.len() == roster.len()
            && self.missing(roster).is_empty()
    }

    /// Every turn in the round is an abstention.
    pub fn all_turns_abstained(&self) -> bool {
        !self.turns.is_empty() && self.turns.iter().all(Turn::is_abstention)
    }

    pub fn tally(&self) -> Tally {
        Tally::from_votes(&self.votes)
    }
}
