//! `think`: a scratchpad. Echoes the thought back, no external call.

use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};

pub const THINK: &str = "think";

pub fn think_definition() -> ToolDefinition {
    ToolDefinition::new(
        THINK,
        "Write down intermediate reasoning before answering. Nothing is looked up.",
    )
    .with_parameter(ToolParameter::new("thought", "Your reasoning", true).with_type("string"))
}

pub fn execute_think(call: &ToolCall) -> ToolResult {
    match call.require_string("thought") {
        Ok(thought) => ToolResult::success(THINK, format!("Noted: {}", thought.trim())),
        Err(e) => ToolResult::failure(THINK, ToolError::invalid_argument(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_think_echoes() {
        let call = ToolCall::new(THINK).with_arg("thought", " compare ETF flows ");
        let result = execute_think(&call);
        assert_eq!(result.output(), Some("Noted: compare ETF flows"));
        assert!(result.metadata.sources.is_empty());
    }

    #[test]
    fn test_think_requires_thought() {
        assert!(!execute_think(&ToolCall::new(THINK)).is_success());
    }
}
