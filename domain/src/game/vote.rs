//! Ballots and their tally.

use super::participant::ParticipantId;
use super::rule::VoteRule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest number of names one ballot may carry (the maximum minority size).
pub const MAX_VOTE_TARGETS: usize = 2;

/// A participant's declared belief about who holds the other word
///
/// # Example
///
/// ```
/// use roundtable_domain::game::Vote;
///
/// let v = Vote::cast("Agent 1", 1, vec!["Agent 1".into(), "Agent 3".into()], "");
/// assert_eq!(v.targets.len(), 1); // self-votes are dropped
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Sequence number in the session's context log (assigned on append)
    #[serde(default)]
    pub seq: u64,
    pub voter: ParticipantId,
    pub round: u32,
    pub targets: Vec<ParticipantId>,
    #[serde(default)]
    pub reasoning: String,
    /// True when vote production failed on every attempt
    #[serde(default)]
    pub abstained: bool,
}

impl Vote {
    /// Build a ballot, removing self-votes and duplicates and keeping at
    /// most [`MAX_VOTE_TARGETS`] names in the order given.
    pub fn cast(
        voter: impl Into<ParticipantId>,
        round: u32,
        targets: Vec<ParticipantId>,
        reasoning: impl Into<String>,
    ) -> Self {
        let voter = voter.into();
        let mut kept: Vec<ParticipantId> = Vec::new();
        for target in targets {
            if target.matches(voter.as_str()) || kept.iter().any(|k| k.matches(target.as_str())) {
                continue;
            }
            kept.push(target);
            if kept.len() == MAX_VOTE_TARGETS {
                break;
            }
        }

        Self {
            seq: 0,
            voter,
            round,
            targets: kept,
            reasoning: reasoning.into(),
            abstained: false,
        }
    }

    /// A null ballot, excluded from the tally.
    pub fn abstention(voter: impl Into<ParticipantId>, round: u32) -> Self {
        Self {
            seq: 0,
            voter: voter.into(),
            round,
            targets: Vec::new(),
            reasoning: String::new(),
            abstained: true,
        }
    }

    pub fn names(&self, id: &ParticipantId) -> bool {
        self.targets.iter().any(|t| t == id)
    }
}

/// Ballot counts for one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Non-abstaining ballots counted
    pub ballots: usize,
    /// Abstentions (null ballots)
    pub abstentions: usize,
    /// How many ballots name each participant
    pub counts: BTreeMap<ParticipantId, usize>,
}

impl Tally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a Vote>) -> Self {
        let mut tally = Tally::default();
        for vote in votes {
            if vote.abstained {
                tally.abstentions += 1;
                continue;
            }
            tally.ballots += 1;
            for target in &vote.targets {
                *tally.counts.entry(target.clone()).or_insert(0) += 1;
            }
        }
        tally
    }

    pub fn count_for(&self, id: &ParticipantId) -> usize {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// True when every listed participant meets `rule` on its own.
    ///
    /// An empty list or a tally without ballots is never satisfied.
    pub fn names_all(&self, minority: &[&ParticipantId], rule: VoteRule) -> bool {
        !minority.is_empty()
            && minority
                .iter()
                .all(|id| rule.is_satisfied(self.count_for(id), self.ballots))
    }

    /// Participants ordered by ballot count (highest first, then by id).
    pub fn ranking(&self) -> Vec<(&ParticipantId, usize)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(id, n)| (id, *n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}
