//! Turns: one participant's public contribution to a round.

use super::participant::ParticipantId;
use crate::tool::{ToolCall, ToolResult};
use serde::{Deserialize, Serialize};

/// One request/response pair made across the capability boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityInvocation {
    pub call: ToolCall,
    pub result: ToolResult,
}

impl CapabilityInvocation {
    pub fn new(call: ToolCall, result: ToolResult) -> Self {
        Self { call, result }
    }
}

/// A participant's turn (Entity, append-only)
///
/// `content == None` is a null turn: the participant failed on every attempt
/// and abstains for this round. Null turns stay in the log for audit but are
/// never shown to other participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Sequence number in the session's context log (assigned on append)
    pub seq: u64,
    /// Round number (1-indexed)
    pub round: u32,
    pub speaker: ParticipantId,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<CapabilityInvocation>,
    /// Number of production attempts used (1 = first try succeeded)
    pub attempts: u8,
}

impl Turn {
    /// A turn with content. `seq` is filled in by the context log.
    pub fn spoken(
        round: u32,
        speaker: ParticipantId,
        content: impl Into<String>,
        attempts: u8,
    ) -> Self {
        Self {
            seq: 0,
            round,
            speaker,
            content: Some(content.into()),
            invocations: Vec::new(),
            attempts,
        }
    }

    /// A null turn after every attempt failed.
    pub fn abstained(round: u32, speaker: ParticipantId, attempts: u8) -> Self {
        Self {
            seq: 0,
            round,
            speaker,
            content: None,
            invocations: Vec::new(),
            attempts,
        }
    }

    pub fn with_invocations(mut self, invocations: Vec<CapabilityInvocation>) -> Self {
        self.invocations = invocations;
        self
    }

    pub fn is_abstention(&self) -> bool {
        self.content.is_none()
    }

    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_and_abstained() {
        let t = Turn::spoken(1, "Agent 1".into(), "Crunchy and often red.", 1);
        assert!(!t.is_abstention());
        assert_eq!(t.text(), Some("Crunchy and often red."));

        let n = Turn::abstained(1, "Agent 2".into(), 2);
        assert!(n.is_abstention());
        assert_eq!(n.attempts, 2);
    }

    #[test]
    fn test_invocations_are_serialized_only_when_present() {
        let t = Turn::spoken(1, "Agent 1".into(), "text", 1);
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("invocations").is_none());

        let t = t.with_invocations(vec![CapabilityInvocation::new(
            ToolCall::new("think").with_arg("thought", "hmm"),
            ToolResult::success("think", "noted"),
        )]);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["invocations"][0]["call"]["tool_name"], "think");
    }
}
