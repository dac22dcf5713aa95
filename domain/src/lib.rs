//! Domain layer for roundtable
//!
//! This crate contains the core rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Odd One Out
//!
//! A coordinator seats three or more model-backed participants, hands most
//! of them one word and one or two of them a related word, then runs rounds
//! of descriptions and ballots until the table names every odd one out,
//! a referee rules a success criterion met, or the round limit is reached.
//!
//! ## Research → Analysis
//!
//! A fixed two-step pipeline: a researcher gathers evidence with tools, an
//! analyst reads the report and returns a decision with a risk label and
//! the merged citation list.

pub mod config;
pub mod context;
pub mod core;
pub mod game;
pub mod orchestration;
pub mod pipeline;
pub mod prompt;
pub mod tool;

// Re-export commonly used types
pub use config::{OutputFormat, TerminationPolicy};
pub use context::{ContextLog, LogEntry, PublicUtterance};
pub use core::{error::DomainError, model::Model};
pub use game::{
    Assignment, CapabilityInvocation, CoordinatorState, GameOutcome, GameResult, GameSession,
    Participant, ParticipantId, ProtocolViolation, Roster, Round, SessionId, SessionStatus, Tally,
    Turn, Vote, VoteRule, parse_judge_verdict, parse_vote_targets,
};
pub use orchestration::Phase;
pub use pipeline::{
    Citation, Decision, DecisionReport, RiskLabel, extract_citations, merge_citations,
    parse_decision, parse_risk_label,
};
pub use prompt::{DEFAULT_SUCCESS_CRITERION, PromptTemplate};
pub use tool::{
    ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolResultMetadata, ToolSpec,
    parse_tool_calls, strip_tool_blocks,
};
