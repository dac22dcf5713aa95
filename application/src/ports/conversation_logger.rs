//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (turns, ballots, violations, pipeline reports) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing event-specific
/// fields. The adapter adds the timestamp when it writes the record.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "turn", "vote", "session_concluded").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    /// Create a new conversation event.
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is intentionally synchronous and non-fallible to avoid
/// disrupting the main execution flow. Logging failures are silently ignored.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

/// Build an event whose payload carries the session id.
///
/// Non-object payloads are wrapped as `{"session": .., "value": ..}`.
pub fn session_event(event_type: &'static str, session: &str, payload: Value) -> ConversationEvent {
    let payload = match payload {
        Value::Object(mut map) => {
            map.insert("session".to_string(), Value::String(session.to_string()));
            Value::Object(map)
        }
        other => serde_json::json!({ "session": session, "value": other }),
    };
    ConversationEvent::new(event_type, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_event_adds_session_field() {
        let event = session_event("turn", "abc", json!({"speaker": "Agent 1"}));
        assert_eq!(event.event_type, "turn");
        assert_eq!(event.payload["session"], "abc");
        assert_eq!(event.payload["speaker"], "Agent 1");
    }

    #[test]
    fn test_session_event_wraps_scalars() {
        let event = session_event("note", "abc", json!(3));
        assert_eq!(event.payload, json!({"session": "abc", "value": 3}));
    }
}
