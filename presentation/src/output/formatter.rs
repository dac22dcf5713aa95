//! Output formatter trait

use roundtable_domain::{DecisionReport, GameResult};

/// Trait for rendering results at each output level
pub trait OutputFormatter {
    /// Every round: turns, votes and tallies
    fn format(&self, result: &GameResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &GameResult) -> String;

    /// Outcome and revealed words only
    fn format_summary(&self, result: &GameResult) -> String;

    /// Research, decision and citations
    fn format_report(&self, report: &DecisionReport, full: bool) -> String;
}
