//! Text-based tool calling convention.
//!
//! Hosted chat endpoints differ in native function-calling support, so
//! capabilities are requested with fenced JSON blocks that work everywhere:
//!
//! ````text
//! ```tool
//! {"tool": "web_search", "args": {"query": "ethereum roadmap"}, "reasoning": "..."}
//! ```
//! ````

use super::entities::ToolCall;

const TOOL_FENCE: &str = "```tool";
const FENCE: &str = "```";

/// Parse every ```` ```tool ```` block in a model response.
///
/// Blocks that are not valid JSON or lack a `"tool"` field are skipped.
pub fn parse_tool_calls(response: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let mut in_tool_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        if line.trim() == TOOL_FENCE {
            in_tool_block = true;
            current_block.clear();
        } else if in_tool_block && line.trim() == FENCE {
            in_tool_block = false;
            if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&current_block)
                && let Some(tool_name) = parsed.get("tool").and_then(|v| v.as_str())
            {
                let mut call = ToolCall::new(tool_name);

                if let Some(args) = parsed.get("args").and_then(|v| v.as_object()) {
                    for (key, value) in args {
                        call = call.with_arg(key, value.clone());
                    }
                }

                if let Some(reasoning) = parsed.get("reasoning").and_then(|v| v.as_str()) {
                    call = call.with_reasoning(reasoning);
                }

                calls.push(call);
            }
        } else if in_tool_block {
            current_block.push_str(line);
            current_block.push('\n');
        }
    }

    calls
}

/// Remove ```` ```tool ```` blocks, leaving the prose around them.
pub fn strip_tool_blocks(response: &str) -> String {
    let mut kept = Vec::new();
    let mut in_tool_block = false;

    for line in response.lines() {
        if line.trim() == TOOL_FENCE {
            in_tool_block = true;
        } else if in_tool_block && line.trim() == FENCE {
            in_tool_block = false;
        } else if !in_tool_block {
            kept.push(line);
        }
    }

    kept.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"
Let me look this up.

```tool
{
  "tool": "web_search",
  "args": {"query": "bitcoin ETF flows"},
  "reasoning": "Need recent data"
}
```

```tool
{"tool": "market_quote", "args": {"symbol": "BTC-USD"}}
```

```tool
not json
```
"#;

    #[test]
    fn test_parse_multiple_calls() {
        let calls = parse_tool_calls(RESPONSE);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "web_search");
        assert_eq!(calls[0].get_string("query"), Some("bitcoin ETF flows"));
        assert_eq!(calls[0].reasoning.as_deref(), Some("Need recent data"));
        assert_eq!(calls[1].get_string("symbol"), Some("BTC-USD"));
    }

    #[test]
    fn test_plain_response_has_no_calls() {
        assert!(parse_tool_calls("Sell half now; risk level: high.").is_empty());
    }

    #[test]
    fn test_strip_tool_blocks() {
        assert_eq!(strip_tool_blocks(RESPONSE), "Let me look this up.");
        assert_eq!(strip_tool_blocks("no blocks"), "no blocks");
    }
}
