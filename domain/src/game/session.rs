//! Game session aggregate owned by the coordinator.

use super::assignment::Assignment;
use super::outcome::{GameOutcome, GameResult};
use super::participant::{ParticipantId, Roster};
use super::round::Round;
use super::rule::VoteRule;
use super::state::CoordinatorState;
use super::turn::Turn;
use super::violation::{ProtocolViolation, audit_round, detect_leak};
use super::vote::Vote;
use crate::context::{ContextLog, PublicUtterance};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Unique id of one protocol run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Random v4 UUID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Concluded,
}

/// One run of the odd-one-out protocol
///
/// All writes go through methods that check the coordinator state, so turns
/// can only be recorded while a round is in progress and votes only while
/// voting. The assignment is kept private until the session concludes.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    roster: Roster,
    state: CoordinatorState,
    rounds: Vec<Round>,
    log: ContextLog,
    assignment: Option<Assignment>,
    violations: Vec<ProtocolViolation>,
    outcome: Option<GameOutcome>,
    /// Rounds already in the log when this run started
    prior_rounds: u32,
    /// Log entries written by earlier runs
    prior_entries: usize,
    /// Most recent utterances of earlier runs, shown before this run's turns
    recalled: Vec<PublicUtterance>,
}

impl GameSession {
    pub fn new(id: SessionId, roster: Roster) -> Self {
        Self::resume(ContextLog::new(id), roster, 0)
    }

    /// Continue a stored log: numbering picks up after its last round and
    /// entry, and the last `recall` utterances stay visible to players.
    pub fn resume(log: ContextLog, roster: Roster, recall: usize) -> Self {
        let earlier = log.public_transcript();
        let recalled = earlier[earlier.len().saturating_sub(recall)..].to_vec();
        Self {
            id: log.session_id().clone(),
            roster,
            state: CoordinatorState::Init,
            rounds: Vec::new(),
            assignment: None,
            violations: Vec::new(),
            outcome: None,
            prior_rounds: log.last_round(),
            prior_entries: log.len(),
            recalled,
            log,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn status(&self) -> SessionStatus {
        if self.state.is_terminal() {
            SessionStatus::Concluded
        } else {
            SessionStatus::Active
        }
    }

    pub fn log(&self) -> &ContextLog {
        &self.log
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// What players may see: recalled history, then this run's utterances.
    pub fn transcript(&self) -> Vec<PublicUtterance> {
        let mut transcript = self.recalled.clone();
        transcript.extend(self.log.public_transcript_from(self.prior_entries));
        transcript
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn violations(&self) -> &[ProtocolViolation] {
        &self.violations
    }

    fn advance(&mut self, next: CoordinatorState) -> Result<(), DomainError> {
        self.state = self.state.transition(next)?;
        Ok(())
    }

    /// INIT → ASSIGNING: store the secret word mapping.
    pub fn assign(&mut self, assignment: Assignment) -> Result<(), DomainError> {
        self.advance(CoordinatorState::Assigning)?;
        self.assignment = Some(assignment);
        Ok(())
    }

    /// The private word of one participant, for building its own prompt.
    pub fn word_for(&self, id: &ParticipantId) -> Option<&str> {
        self.assignment.as_ref().and_then(|a| a.word_for(id))
    }

    /// Odd-one-out seats, for the referee prompt. Never shown to players.
    pub fn odd_ones_out(&self) -> Vec<&ParticipantId> {
        self.assignment
            .as_ref()
            .map(|a| a.minority_holders())
            .unwrap_or_default()
    }

    /// Start the next round and return its number.
    pub fn begin_round(&mut self) -> Result<u32, DomainError> {
        self.advance(CoordinatorState::RoundInProgress)?;
        let number = self.prior_rounds + self.rounds.len() as u32 + 1;
        self.rounds.push(Round::new(number));
        Ok(number)
    }

    fn open_round(&mut self) -> Result<&mut Round, DomainError> {
        self.rounds
            .last_mut()
            .ok_or_else(|| DomainError::InvalidTransition {
                from: CoordinatorState::Init.to_string(),
                to: CoordinatorState::RoundInProgress.to_string(),
            })
    }

    fn require_state(&self, expected: CoordinatorState) -> Result<(), DomainError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: self.state.to_string(),
                to: expected.to_string(),
            })
        }
    }

    fn require_member(&self, id: &ParticipantId) -> Result<(), DomainError> {
        if self.roster.contains(id) {
            Ok(())
        } else {
            Err(DomainError::UnknownParticipant(id.to_string()))
        }
    }

    /// Append a turn to the log and the open round.
    ///
    /// Returns the leak violation, if the turn revealed the speaker's word.
    pub fn record_turn(&mut self, mut turn: Turn) -> Result<Option<ProtocolViolation>, DomainError> {
        self.require_state(CoordinatorState::RoundInProgress)?;
        self.require_member(&turn.speaker)?;
        let round_number = self.open_round()?.number;
        if self.open_round()?.has_turn_from(&turn.speaker) {
            return Err(DomainError::AlreadyRecorded {
                participant: turn.speaker.to_string(),
                round: round_number,
            });
        }
        turn.round = round_number;

        let leak = match (turn.text(), self.word_for(&turn.speaker)) {
            (Some(content), Some(word)) => detect_leak(&turn.speaker, round_number, content, word),
            _ => None,
        };

        turn.seq = self.log.append_turn(turn.clone());
        self.open_round()?.turns.push(turn);

        if let Some(v) = &leak {
            self.violations.push(v.clone());
        }
        Ok(leak)
    }

    /// ROUND_IN_PROGRESS → VOTING
    pub fn begin_voting(&mut self) -> Result<(), DomainError> {
        self.advance(CoordinatorState::Voting)
    }

    pub fn record_vote(&mut self, mut vote: Vote) -> Result<(), DomainError> {
        self.require_state(CoordinatorState::Voting)?;
        self.require_member(&vote.voter)?;
        let round_number = self.open_round()?.number;
        if self.open_round()?.has_vote_from(&vote.voter) {
            return Err(DomainError::AlreadyRecorded {
                participant: vote.voter.to_string(),
                round: round_number,
            });
        }
        vote.round = round_number;
        vote.seq = self.log.append_vote(vote.clone());
        self.open_round()?.votes.push(vote);
        Ok(())
    }

    /// VOTING → EVALUATING, auditing the round for missing entries.
    pub fn begin_evaluation(&mut self) -> Result<Option<ProtocolViolation>, DomainError> {
        self.advance(CoordinatorState::Evaluating)?;
        let audit = self
            .current_round()
            .and_then(|round| audit_round(round, &self.roster));
        if let Some(v) = &audit {
            self.violations.push(v.clone());
        }
        Ok(audit)
    }

    /// Majority-correct check on the current round's ballots.
    pub fn minority_identified(&self, rule: VoteRule) -> bool {
        let (Some(round), Some(assignment)) = (self.current_round(), &self.assignment) else {
            return false;
        };
        round
            .tally()
            .names_all(&assignment.minority_holders(), rule)
    }

    /// Move to CONCLUDED from any live state.
    pub fn conclude(&mut self, outcome: GameOutcome) -> Result<(), DomainError> {
        self.advance(CoordinatorState::Concluded)?;
        self.outcome = Some(outcome);
        Ok(())
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// The full mapping, available only after the session has concluded.
    pub fn reveal(&self) -> Option<&Assignment> {
        if self.state.is_terminal() {
            self.assignment.as_ref()
        } else {
            None
        }
    }

    /// Consume a concluded session into its result.
    pub fn into_result(self) -> Result<GameResult, DomainError> {
        let Some(outcome) = self.outcome.filter(|_| self.state.is_terminal()) else {
            return Err(DomainError::InvalidTransition {
                from: self.state.to_string(),
                to: CoordinatorState::Concluded.to_string(),
            });
        };
        Ok(GameResult {
            session_id: self.id,
            outcome,
            rounds: self.rounds,
            log: self.log,
            assignment: self.assignment,
            violations: self.violations,
        })
    }
}
