//! Shared HTTP plumbing for the network-backed capabilities.

use roundtable_domain::tool::{ToolError, ToolResult};
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("roundtable/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout for capability calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the client shared by every capability of one executor.
pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Send a request and decode a JSON body, mapping every failure to a
/// failed [`ToolResult`] for `tool`.
pub(crate) async fn send_json(
    tool: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, ToolResult> {
    let response = request.send().await.map_err(|e| {
        let error = if e.is_timeout() {
            ToolError::timeout(tool)
        } else {
            ToolError::execution_failed(format!("Request failed: {}", e))
        };
        ToolResult::failure(tool, error)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ToolResult::failure(
            tool,
            ToolError::execution_failed(format!("HTTP {}", status.as_u16()))
                .with_details(truncate(&body, 500)),
        ));
    }

    response.json().await.map_err(|e| {
        ToolResult::failure(
            tool,
            ToolError::execution_failed(format!("Failed to parse response: {}", e)),
        )
    })
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    format!("{}...", &text[..text.floor_char_boundary(max)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("héllo", 2), "h...");
    }
}
