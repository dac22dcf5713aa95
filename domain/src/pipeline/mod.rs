//! Research → analysis pipeline types: citations, the decision report, and
//! the parsers that read a decision and risk level out of analyst prose.

pub mod citation;
pub mod parsing;
pub mod report;

pub use citation::{Citation, extract_citations, merge_citations};
pub use parsing::{parse_decision, parse_risk_label};
pub use report::{Decision, DecisionReport, RiskLabel};
