//! Participants and the roster they sit in.

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Minimum number of seats for an odd-one-out game.
pub const MIN_ROSTER_SIZE: usize = 3;

/// Public identity of a participant (e.g. "Agent 1").
///
/// Ids are compared case-sensitively in maps but a [`Roster`] refuses two ids
/// that differ only by case, so vote parsing can match names loosely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against free text.
    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name.trim())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A role-bound actor seat (Entity)
///
/// Immutable once the session starts. The private word is *not* stored
/// here: it lives in the coordinator's [`Assignment`](super::Assignment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Role label shown in prompts and output (e.g. "player", "researcher")
    pub role: String,
    /// Backing model
    pub model: Model,
    /// Names of the capabilities (tools) this participant may invoke
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, role: impl Into<String>, model: Model) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            model,
            capabilities: Vec::new(),
        }
    }

    /// Create a game player seat.
    pub fn player(id: impl Into<ParticipantId>, model: Model) -> Self {
        Self::new(id, "player", model)
    }

    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.push(name.into());
        self
    }
}

/// Validated, ordered set of participants.
///
/// The order is the fixed speaking order for every round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Result<Self, DomainError> {
        if participants.len() < MIN_ROSTER_SIZE {
            return Err(DomainError::RosterTooSmall {
                min: MIN_ROSTER_SIZE,
                actual: participants.len(),
            });
        }

        for (i, p) in participants.iter().enumerate() {
            if p.id.as_str().trim().is_empty() {
                return Err(DomainError::EmptyParticipantName);
            }
            if participants[..i].iter().any(|q| q.id.matches(p.id.as_str())) {
                return Err(DomainError::DuplicateParticipant(p.id.to_string()));
            }
        }

        Ok(Self { participants })
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| &p.id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Look up a participant by a loosely written name.
    pub fn find_by_name(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id.matches(name))
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }
}
