//! Model-backed actor with a text tool loop.

use super::tool_helpers::tool_args_preview;
use crate::config::ExecutionParams;
use crate::ports::actor::{ActContext, ActError, ActOutput, Actor};
use crate::ports::capability::CapabilityPort;
use crate::ports::llm_gateway::{LlmGateway, LlmSession};
use async_trait::async_trait;
use roundtable_domain::{
    CapabilityInvocation, Citation, Model, PromptTemplate, ToolCall, ToolResult, extract_citations,
    merge_citations, parse_tool_calls, strip_tool_blocks,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An [`Actor`] backed by one hosted model
///
/// Each `act` opens a fresh session with the actor's instructions. If the
/// actor has capabilities, the model may answer with ```` ```tool ```` blocks;
/// every call in one response is run concurrently and the results go back to
/// the same session, for at most `max_tool_turns` exchanges.
pub struct LlmActor {
    name: String,
    gateway: Arc<dyn LlmGateway>,
    model: Model,
    instructions: String,
    capabilities: Option<Arc<dyn CapabilityPort>>,
    params: ExecutionParams,
}

impl LlmActor {
    pub fn new(
        name: impl Into<String>,
        gateway: Arc<dyn LlmGateway>,
        model: Model,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            gateway,
            model,
            instructions: instructions.into(),
            capabilities: None,
            params: ExecutionParams::default(),
        }
    }

    pub fn with_capabilities(mut self, capabilities: Arc<dyn CapabilityPort>) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    fn system_prompt(&self) -> String {
        match &self.capabilities {
            Some(caps) if !caps.tool_spec().is_empty() => format!(
                "{}{}",
                self.instructions,
                PromptTemplate::tool_instructions(caps.tool_spec())
            ),
            _ => self.instructions.clone(),
        }
    }

    async fn send(&self, session: &dyn LlmSession, message: &str) -> Result<String, ActError> {
        match self.params.call_timeout {
            Some(limit) => tokio::time::timeout(limit, session.send(message))
                .await
                .map_err(|_| ActError::Timeout(limit))?
                .map_err(ActError::from),
            None => session.send(message).await.map_err(ActError::from),
        }
    }

    async fn run_calls(
        &self,
        caps: &dyn CapabilityPort,
        calls: Vec<ToolCall>,
    ) -> Vec<(ToolCall, ToolResult)> {
        for call in &calls {
            debug!(
                actor = %self.name,
                tool = %call.tool_name,
                "Capability call: {}",
                tool_args_preview(call)
            );
        }

        let results = futures::future::join_all(calls.iter().map(|call| caps.invoke(call))).await;

        calls.into_iter().zip(results).collect()
    }
}

#[async_trait]
impl Actor for LlmActor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn act(&self, ctx: &ActContext) -> Result<ActOutput, ActError> {
        let session = self
            .gateway
            .create_session_with_system_prompt(&self.model, &self.system_prompt())
            .await?;

        let mut message = ctx.prompt.clone();
        let mut invocations: Vec<CapabilityInvocation> = Vec::new();
        let mut tool_sources: Vec<Citation> = Vec::new();
        let mut tool_turns = 0;

        let final_text = loop {
            let response = self.send(session.as_ref(), &message).await?;

            let calls = match &self.capabilities {
                Some(_) => parse_tool_calls(&response),
                None => Vec::new(),
            };
            if calls.is_empty() {
                break strip_tool_blocks(&response);
            }
            if tool_turns >= self.params.max_tool_turns {
                warn!(
                    actor = %self.name,
                    "Tool loop exceeded max_tool_turns ({}), using last response",
                    self.params.max_tool_turns
                );
                break strip_tool_blocks(&response);
            }
            let Some(caps) = &self.capabilities else {
                break strip_tool_blocks(&response);
            };

            tool_turns += 1;
            info!(
                actor = %self.name,
                phase = %ctx.phase,
                "Tool turn {}: {} call(s)",
                tool_turns,
                calls.len()
            );

            let results = self.run_calls(caps.as_ref(), calls).await;
            for (call, result) in &results {
                if !result.is_success() {
                    warn!(
                        actor = %self.name,
                        tool = %call.tool_name,
                        "Capability failed: {}",
                        result.as_feedback()
                    );
                }
                let sources: Vec<Citation> = result
                    .metadata
                    .sources
                    .iter()
                    .map(|s| Citation::new(s.as_str()))
                    .collect();
                tool_sources = merge_citations(&tool_sources, &sources);
            }
            message = PromptTemplate::tool_results(&results);
            invocations.extend(
                results
                    .into_iter()
                    .map(|(call, result)| CapabilityInvocation::new(call, result)),
            );
        };

        if final_text.trim().is_empty() {
            return Err(ActError::EmptyResponse);
        }

        let citations = merge_citations(&tool_sources, &extract_citations(&final_text));
        Ok(ActOutput {
            content: final_text,
            invocations,
            citations,
        })
    }
}
