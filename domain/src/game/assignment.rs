//! Secret word assignment (the ASSIGNING state).
//!
//! The candidate list supplied at session start is reduced to two distinct
//! words: the most frequent becomes the majority word, the next most frequent
//! the odd-one-out word. One or two seats receive the odd word, chosen by
//! shuffling the roster with an injected RNG so tests and replays can seed it.

use super::participant::{ParticipantId, Roster};
use crate::core::error::DomainError;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Upper bound on odd-one-out seats.
pub const MAX_MINORITY_SEATS: usize = 2;

/// The full word mapping for one session.
///
/// Owned exclusively by the coordinator. Participants only ever receive
/// their own word through [`Assignment::word_for`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// One entry per seat, in roster order
    words: Vec<(ParticipantId, String)>,
    majority_word: String,
    minority_word: String,
    /// Distinct candidates that were neither majority nor minority
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ignored: Vec<String>,
}

impl Assignment {
    /// Partition `candidates` across `roster`.
    ///
    /// Candidates are compared case-insensitively after trimming; the first
    /// spelling seen is kept. Frequency ties go to the earlier candidate.
    pub fn partition<R: Rng + ?Sized>(
        roster: &Roster,
        candidates: &[String],
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        // (spelling, count) in first-appearance order
        let mut counts: Vec<(String, usize)> = Vec::new();
        for raw in candidates {
            let word = raw.trim();
            if word.is_empty() {
                continue;
            }
            match counts
                .iter_mut()
                .find(|(seen, _)| seen.eq_ignore_ascii_case(word))
            {
                Some((_, n)) => *n += 1,
                None => counts.push((word.to_string(), 1)),
            }
        }

        if counts.is_empty() {
            return Err(DomainError::NoCandidates);
        }
        if counts.len() == 1 {
            return Err(DomainError::SingleCandidate(counts.remove(0).0));
        }

        // Stable: equal counts keep first-appearance order
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let mut distinct = counts.into_iter();
        let (majority_word, _) = distinct.next().ok_or(DomainError::NoCandidates)?;
        let (minority_word, minority_count) =
            distinct.next().ok_or(DomainError::NoCandidates)?;
        let ignored: Vec<String> = distinct.map(|(w, _)| w).collect();

        let seats = roster.len();
        let mut minority_seats = minority_count.clamp(1, MAX_MINORITY_SEATS);
        while minority_seats > 1 && seats - minority_seats <= minority_seats {
            minority_seats -= 1;
        }

        let mut order: Vec<usize> = (0..seats).collect();
        order.shuffle(rng);
        let odd_seats = &order[..minority_seats];

        let words = roster
            .ids()
            .enumerate()
            .map(|(i, id)| {
                let word = if odd_seats.contains(&i) {
                    minority_word.clone()
                } else {
                    majority_word.clone()
                };
                (id.clone(), word)
            })
            .collect();

        Ok(Self {
            words,
            majority_word,
            minority_word,
            ignored,
        })
    }

    /// The private word for one participant.
    pub fn word_for(&self, id: &ParticipantId) -> Option<&str> {
        self.words
            .iter()
            .find(|(p, _)| p == id)
            .map(|(_, w)| w.as_str())
    }

    pub fn majority_word(&self) -> &str {
        &self.majority_word
    }

    pub fn minority_word(&self) -> &str {
        &self.minority_word
    }

    /// Candidates dropped because only two distinct words are played.
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    pub fn is_minority(&self, id: &ParticipantId) -> bool {
        self.word_for(id) == Some(self.minority_word.as_str())
    }

    /// Seats holding the odd-one-out word, in roster order.
    pub fn minority_holders(&self) -> Vec<&ParticipantId> {
        self.words
            .iter()
            .filter(|(_, w)| *w == self.minority_word)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn majority_holders(&self) -> Vec<&ParticipantId> {
        self.words
            .iter()
            .filter(|(_, w)| *w == self.majority_word)
            .map(|(id, _)| id)
            .collect()
    }

    /// Iterate the full mapping in roster order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &str)> {
        self.words.iter().map(|(id, w)| (id, w.as_str()))
    }
}
