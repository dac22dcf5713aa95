//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for game results and decision reports
///
/// Shared by the CLI flag and the `[output]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full transcript: every turn, vote and tally
    Full,
    /// Outcome and revealed words only (default)
    #[default]
    Summary,
    /// JSON output
    Json,
}
