//! Execution parameters: actor loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the tool
//! loop in [`LlmActor`](crate::agents::LlmActor). These are application-layer
//! concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Actor loop control parameters.
///
/// | Role | Typical `max_tool_turns` |
/// |------|--------------------------|
/// | Player | 0 (no capabilities) |
/// | Researcher | 4 |
/// | Analyst | 4 |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum tool exchanges before the model must answer.
    pub max_tool_turns: usize,
    /// Timeout for each model call.
    pub call_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_tool_turns: 4,
            call_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = max;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_tool_turns, 4);
        assert_eq!(params.call_timeout, Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_tool_turns(0)
            .with_call_timeout(None);

        assert_eq!(params.max_tool_turns, 0);
        assert!(params.call_timeout.is_none());
    }
}
