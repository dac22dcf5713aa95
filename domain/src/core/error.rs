//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Everything here is a configuration or protocol-state problem: fatal for
/// the current session and never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Roster needs at least {min} participants, got {actual}")]
    RosterTooSmall { min: usize, actual: usize },

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    #[error("Candidate values cannot be empty")]
    NoCandidates,

    #[error("Candidate values need at least two distinct words, got only {0:?}")]
    SingleCandidate(String),

    #[error("max_rounds must be greater than zero")]
    ZeroRounds,

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{participant} already has an entry in round {round}")]
    AlreadyRecorded { participant: String, round: u32 },

    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Whether this error stems from a malformed roster, candidate list or
    /// parameter set (as opposed to a state machine misuse).
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            DomainError::InvalidTransition { .. }
                | DomainError::AlreadyRecorded { .. }
                | DomainError::UnknownParticipant(_)
                | DomainError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_roster_error_display() {
        let error = DomainError::RosterTooSmall { min: 3, actual: 2 };
        assert_eq!(
            error.to_string(),
            "Roster needs at least 3 participants, got 2"
        );
    }

    #[test]
    fn test_configuration_classification() {
        assert!(DomainError::NoCandidates.is_configuration());
        assert!(DomainError::ZeroRounds.is_configuration());
        assert!(!DomainError::Cancelled.is_configuration());
        assert!(
            !DomainError::InvalidTransition {
                from: "init".into(),
                to: "voting".into()
            }
            .is_configuration()
        );
    }
}
