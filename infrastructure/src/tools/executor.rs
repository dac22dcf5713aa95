//! Local capability executor: the concrete [`CapabilityPort`].
//!
//! ```text
//! CapabilityPort::invoke()
//!   ├─ resolve alias → canonical name   (unknown → NOT_FOUND)
//!   ├─ check required parameters        (missing → INVALID_ARGUMENT)
//!   └─ dispatch
//!        ├─ think                         (local)
//!        ├─ market_quote, answer_search  (reqwest)
//!        └─ web_search, web_fetch        (reqwest, `web-tools` feature)
//! ```
//!
//! All network tools share one `reqwest::Client` with a per-request timeout.

use super::answer::{self, AnswerEngine};
use super::{http, market, think};
use async_trait::async_trait;
use roundtable_application::ports::capability::CapabilityPort;
use roundtable_domain::tool::{ToolCall, ToolError, ToolResult, ToolSpec};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalCapabilityExecutor {
    tool_spec: ToolSpec,
    http_client: reqwest::Client,
    answer_engine: Option<AnswerEngine>,
}

impl LocalCapabilityExecutor {
    /// Executor for the given tools with the default HTTP timeout.
    pub fn new(tool_spec: ToolSpec) -> Self {
        Self::with_timeout(tool_spec, http::DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(tool_spec: ToolSpec, timeout: Duration) -> Self {
        Self {
            tool_spec,
            http_client: http::build_client(timeout),
            answer_engine: None,
        }
    }

    /// Enable `answer_search` backed by `engine`.
    pub fn with_answer_engine(mut self, engine: AnswerEngine) -> Self {
        self.tool_spec = self
            .tool_spec
            .register(answer::answer_search_definition());
        self.answer_engine = Some(engine);
        self
    }

    fn validate(&self, name: &str, call: &ToolCall) -> Result<(), ToolResult> {
        let Some(definition) = self.tool_spec.get(name) else {
            return Err(ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(&call.tool_name),
            ));
        };
        let missing: Vec<&str> = definition
            .parameters
            .iter()
            .filter(|p| p.required && !call.arguments.contains_key(&p.name))
            .map(|p| p.name.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ToolResult::failure(
                name,
                ToolError::invalid_argument(format!(
                    "Missing required parameter(s): {}",
                    missing.join(", ")
                )),
            ))
        }
    }

    async fn dispatch(&self, name: &str, call: &ToolCall) -> ToolResult {
        match name {
            think::THINK => think::execute_think(call),
            market::MARKET_QUOTE => market::execute_market_quote(&self.http_client, call).await,
            answer::ANSWER_SEARCH => match &self.answer_engine {
                Some(engine) => {
                    answer::execute_answer_search(&self.http_client, engine, call).await
                }
                None => ToolResult::failure(
                    name,
                    ToolError::unavailable("answer engine is not configured"),
                ),
            },
            #[cfg(feature = "web-tools")]
            super::web::WEB_SEARCH => super::web::execute_web_search(&self.http_client, call).await,
            #[cfg(feature = "web-tools")]
            super::web::WEB_FETCH => super::web::execute_web_fetch(&self.http_client, call).await,
            _ => ToolResult::failure(
                name,
                ToolError::execution_failed(format!("Tool '{}' is not implemented", name)),
            ),
        }
    }
}

#[async_trait]
impl CapabilityPort for LocalCapabilityExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let Some(name) = self.tool_spec.resolve(&call.tool_name).map(str::to_string) else {
            return ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name));
        };
        if let Err(failed) = self.validate(&name, call) {
            return failed;
        }

        debug!(tool = %name, "Invoking capability");
        self.dispatch(&name, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{analysis_tool_spec, research_tool_spec};

    #[tokio::test]
    async fn test_unknown_tool() {
        let executor = LocalCapabilityExecutor::new(research_tool_spec());
        let result = executor.invoke(&ToolCall::new("launch_rocket")).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_parameter() {
        let executor = LocalCapabilityExecutor::new(research_tool_spec());
        let result = executor.invoke(&ToolCall::new("quote")).await;
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert!(result.error().unwrap().message.contains("symbol"));
    }

    #[tokio::test]
    async fn test_local_tool_through_port() {
        let executor = LocalCapabilityExecutor::new(analysis_tool_spec());
        let call = ToolCall::new("think").with_arg("thought", "check volume");
        let result = executor.invoke(&call).await;
        assert!(result.is_success());
        assert_eq!(result.tool_name, "think");
    }

    #[test]
    fn test_answer_engine_registers_tool() {
        let executor = LocalCapabilityExecutor::new(analysis_tool_spec());
        assert!(!executor.has_tool("answer_search"));

        let executor = executor.with_answer_engine(AnswerEngine::new(
            "https://api.perplexity.ai",
            "key",
            "sonar-pro",
        ));
        assert!(executor.has_tool("answer_search"));
        assert!(executor.has_tool("perplexity"));
    }
}
