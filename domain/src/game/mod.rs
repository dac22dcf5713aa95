//! The odd-one-out game: who sits at the table, who holds which word, and
//! how rounds of clues and ballots are recorded and judged.

pub mod assignment;
pub mod outcome;
pub mod parsing;
pub mod participant;
pub mod round;
pub mod rule;
pub mod session;
pub mod state;
pub mod text;
pub mod turn;
pub mod violation;
pub mod vote;

pub use assignment::{Assignment, MAX_MINORITY_SEATS};
pub use outcome::{GameOutcome, GameResult};
pub use parsing::{parse_judge_verdict, parse_vote_targets};
pub use participant::{MIN_ROSTER_SIZE, Participant, ParticipantId, Roster};
pub use round::Round;
pub use rule::VoteRule;
pub use session::{GameSession, SessionId, SessionStatus};
pub use state::CoordinatorState;
pub use turn::{CapabilityInvocation, Turn};
pub use violation::{ProtocolViolation, audit_round, detect_leak};
pub use vote::{MAX_VOTE_TARGETS, Tally, Vote};
