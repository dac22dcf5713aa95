//! `answer_search`: ask a search-grounded answer engine (Perplexity-style
//! chat completion) and keep the citations it returns.

use crate::tools::http::send_json;
use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use serde_json::json;
use std::time::Instant;

pub const ANSWER_SEARCH: &str = "answer_search";

const SYSTEM_PROMPT: &str = "Be precise and concise. Answer with current facts and cite your sources.";

/// Connection settings for the answer engine
#[derive(Debug, Clone)]
pub struct AnswerEngine {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AnswerEngine {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

pub fn answer_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        ANSWER_SEARCH,
        "Ask a web-grounded answer engine a question. Returns a sourced answer with citations.",
    )
    .with_parameter(ToolParameter::new("query", "The question to answer", true).with_type("string"))
}

pub async fn execute_answer_search(
    client: &reqwest::Client,
    engine: &AnswerEngine,
    call: &ToolCall,
) -> ToolResult {
    let start = Instant::now();

    let query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(ANSWER_SEARCH, ToolError::invalid_argument(e)),
    };

    let request = client
        .post(engine.endpoint())
        .bearer_auth(&engine.api_key)
        .json(&json!({
            "model": engine.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": query },
            ],
        }));
    let body = match send_json(ANSWER_SEARCH, request).await {
        Ok(b) => b,
        Err(failed) => return failed,
    };

    match parse_answer(&body) {
        Some((answer, citations)) => {
            let mut output = format!("## Answer: {}\n\n{}", query, answer);
            if !citations.is_empty() {
                output.push_str("\n\nSources:\n");
                for (i, url) in citations.iter().enumerate() {
                    output.push_str(&format!("[{}] {}\n", i + 1, url));
                }
            }
            ToolResult::success(ANSWER_SEARCH, output)
                .with_duration(start.elapsed().as_millis() as u64)
                .with_sources(citations)
        }
        None => ToolResult::failure(
            ANSWER_SEARCH,
            ToolError::execution_failed("Answer engine returned no content"),
        ),
    }
}

/// Content of the first choice plus the citation URLs.
///
/// Accepts both the flat `citations` list and the newer `search_results`
/// objects.
fn parse_answer(body: &serde_json::Value) -> Option<(String, Vec<String>)> {
    let answer = body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let mut citations: Vec<String> = body["citations"]
        .as_array()
        .map(|urls| urls.iter().filter_map(|u| u.as_str()).map(str::to_string).collect())
        .unwrap_or_default();
    if let Some(results) = body["search_results"].as_array() {
        for url in results.iter().filter_map(|r| r["url"].as_str()) {
            if !citations.iter().any(|c| c == url) {
                citations.push(url.to_string());
            }
        }
    }
    Some((answer, citations))
}
