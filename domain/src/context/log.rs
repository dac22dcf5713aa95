//! Append-only record of everything said and voted in a session.

use crate::game::participant::ParticipantId;
use crate::game::session::SessionId;
use crate::game::turn::Turn;
use crate::game::vote::Vote;
use serde::{Deserialize, Serialize};

/// One entry in the shared context log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Turn(Turn),
    Vote(Vote),
}

impl LogEntry {
    pub fn seq(&self) -> u64 {
        match self {
            LogEntry::Turn(t) => t.seq,
            LogEntry::Vote(v) => v.seq,
        }
    }

    pub fn round(&self) -> u32 {
        match self {
            LogEntry::Turn(t) => t.round,
            LogEntry::Vote(v) => v.round,
        }
    }
}

/// A turn as other participants are allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUtterance {
    pub round: u32,
    pub speaker: ParticipantId,
    pub content: String,
}

/// Shared context log, keyed by session id
///
/// Only the coordinator writes. Sequence numbers are assigned here and are
/// strictly increasing; entries are never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextLog {
    session_id: SessionId,
    entries: Vec<LogEntry>,
}

impl ContextLog {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Highest round number recorded, 0 for an empty log.
    pub fn last_round(&self) -> u32 {
        self.entries.iter().map(LogEntry::round).max().unwrap_or(0)
    }

    fn next_seq(&self) -> u64 {
        self.entries.last().map(|e| e.seq() + 1).unwrap_or(1)
    }

    /// Append a turn and return the sequence number it was given.
    pub fn append_turn(&mut self, mut turn: Turn) -> u64 {
        let seq = self.next_seq();
        turn.seq = seq;
        self.entries.push(LogEntry::Turn(turn));
        seq
    }

    /// Append a vote and return the sequence number it was given.
    pub fn append_vote(&mut self, mut vote: Vote) -> u64 {
        let seq = self.next_seq();
        vote.seq = seq;
        self.entries.push(LogEntry::Vote(vote));
        seq
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Turn(t) => Some(t),
            LogEntry::Vote(_) => None,
        })
    }

    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Vote(v) => Some(v),
            LogEntry::Turn(_) => None,
        })
    }

    /// What a participant may see: non-null turn content, in order.
    ///
    /// Votes and abstentions are never included.
    pub fn public_transcript(&self) -> Vec<PublicUtterance> {
        self.public_transcript_from(0)
    }

    /// Public transcript of the entries from index `start` onward.
    pub fn public_transcript_from(&self, start: usize) -> Vec<PublicUtterance> {
        self.entries
            .iter()
            .skip(start)
            .filter_map(|e| match e {
                LogEntry::Turn(t) => Some(t),
                LogEntry::Vote(_) => None,
            })
            .filter_map(|t| {
                t.content.as_ref().map(|content| PublicUtterance {
                    round: t.round,
                    speaker: t.speaker.clone(),
                    content: content.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> ContextLog {
        ContextLog::new(SessionId::new("s-1"))
    }

    #[test]
    fn test_sequence_numbers_increase() {
        let mut log = log();
        let a = log.append_turn(Turn::spoken(1, "Agent 1".into(), "red", 1));
        let b = log.append_turn(Turn::abstained(1, "Agent 2".into(), 2));
        let c = log.append_vote(Vote::cast("Agent 1", 1, vec!["Agent 2".into()], ""));
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(log.len(), 3);
        assert_eq!(log.votes().next().map(|v| v.seq), Some(3));
    }

    #[test]
    fn test_public_transcript_hides_votes_and_null_turns() {
        let mut log = log();
        log.append_turn(Turn::spoken(1, "Agent 1".into(), "It grows on trees.", 1));
        log.append_turn(Turn::abstained(1, "Agent 2".into(), 2));
        log.append_turn(Turn::spoken(1, "Agent 3".into(), "Sweet and juicy.", 1));
        log.append_vote(Vote::cast("Agent 1", 1, vec!["Agent 3".into()], "secret reasoning"));

        let transcript = log.public_transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].speaker.as_str(), "Agent 1");
        assert_eq!(transcript[1].content, "Sweet and juicy.");
    }

    #[test]
    fn test_transcript_from_offset() {
        let mut log = log();
        log.append_turn(Turn::spoken(1, "Agent 1".into(), "earlier", 1));
        log.append_vote(Vote::abstention("Agent 1", 1));
        log.append_turn(Turn::spoken(2, "Agent 2".into(), "later", 1));

        let tail = log.public_transcript_from(2);
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].content, "later");
        assert_eq!(log.last_round(), 2);
        assert_eq!(ContextLog::new(SessionId::new("x")).last_round(), 0);
    }

    #[test]
    fn test_serde_tags_entries() {
        let mut log = log();
        log.append_turn(Turn::spoken(1, "Agent 1".into(), "hi", 1));
        log.append_vote(Vote::abstention("Agent 1", 1));
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["entries"][0]["kind"], "turn");
        assert_eq!(json["entries"][1]["kind"], "vote");

        let back: ContextLog = serde_json::from_value(json).unwrap();
        assert_eq!(back, log);
    }
}
