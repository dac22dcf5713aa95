//! `web_search`: DuckDuckGo Instant Answer lookup.
//!
//! No API key. Returns the abstract, instant answer, definition and up to
//! ten related topics as markdown; every URL in the answer is reported as a
//! source so it can be cited.

use crate::tools::http::send_json;
use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::time::Instant;

pub const WEB_SEARCH: &str = "web_search";

const DDG_API_URL: &str = "https://api.duckduckgo.com/";

const MAX_TOPICS: usize = 10;

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_SEARCH,
        "Search the web for background on a topic. Returns a summary, instant answers and related links.",
    )
    .with_parameter(ToolParameter::new("query", "The search query", true).with_type("string"))
}

pub async fn execute_web_search(client: &reqwest::Client, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let query = match call.require_string("query") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(WEB_SEARCH, ToolError::invalid_argument(e)),
    };

    let request = client.get(DDG_API_URL).query(&[
        ("q", query),
        ("format", "json"),
        ("no_html", "1"),
        ("skip_disambig", "1"),
    ]);
    let body = match send_json(WEB_SEARCH, request).await {
        Ok(b) => b,
        Err(failed) => return failed,
    };

    let (output, sources) = format_search_results(query, &body);
    ToolResult::success(WEB_SEARCH, output)
        .with_duration(start.elapsed().as_millis() as u64)
        .with_sources(sources)
}

/// Render the API response as markdown, returning the text and the URLs it
/// mentions.
fn format_search_results(query: &str, data: &serde_json::Value) -> (String, Vec<String>) {
    let mut sections = vec![format!("## Search results for: {}", query)];
    let mut sources = Vec::new();

    if let Some(text) = non_empty(data, "AbstractText") {
        let source = non_empty(data, "AbstractSource").unwrap_or("Unknown");
        let mut section = format!("### Summary ({})\n{}", source, text);
        if let Some(url) = non_empty(data, "AbstractURL") {
            section.push_str(&format!("\nSource: {}", url));
            sources.push(url.to_string());
        }
        sections.push(section);
    }

    if let Some(answer) = non_empty(data, "Answer") {
        sections.push(format!("### Instant answer\n{}", answer));
    }

    if let Some(definition) = non_empty(data, "Definition") {
        let source = non_empty(data, "DefinitionSource").unwrap_or("Unknown");
        sections.push(format!("### Definition ({})\n{}", source, definition));
    }

    // Topic groups nest their entries under "Topics"
    let topics: Vec<&serde_json::Value> = data["RelatedTopics"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .flat_map(|t| match t["Topics"].as_array() {
                    Some(nested) => nested.iter().collect::<Vec<_>>(),
                    None => vec![t],
                })
                .collect()
        })
        .unwrap_or_default();

    let lines: Vec<String> = topics
        .iter()
        .filter_map(|t| {
            let text = t["Text"].as_str().filter(|s| !s.is_empty())?;
            let url = t["FirstURL"].as_str().unwrap_or_default();
            if !url.is_empty() {
                sources.push(url.to_string());
            }
            Some(format!("- {} ({})", text, url))
        })
        .take(MAX_TOPICS)
        .collect();
    if !lines.is_empty() {
        sections.push(format!("### Related topics\n{}", lines.join("\n")));
    }

    if sections.len() == 1 {
        sections.push(
            "No instant answer available. Use `web_fetch` on a specific URL for details."
                .to_string(),
        );
    }

    (sections.join("\n\n"), sources)
}

fn non_empty<'a>(data: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    data[key].as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_abstract_is_reported_as_source() {
        let data = json!({
            "AbstractText": "Bitcoin is a decentralized digital currency.",
            "AbstractSource": "Wikipedia",
            "AbstractURL": "https://en.wikipedia.org/wiki/Bitcoin",
            "RelatedTopics": []
        });

        let (output, sources) = format_search_results("bitcoin", &data);
        assert!(output.contains("## Search results for: bitcoin"));
        assert!(output.contains("decentralized digital currency"));
        assert!(output.contains("Wikipedia"));
        assert_eq!(sources, vec!["https://en.wikipedia.org/wiki/Bitcoin"]);
    }

    #[test]
    fn test_nested_topic_groups_are_flattened() {
        let data = json!({
            "RelatedTopics": [
                { "Text": "Ethereum - a blockchain", "FirstURL": "https://duckduckgo.com/Ethereum" },
                { "Name": "Exchanges", "Topics": [
                    { "Text": "Kraken - exchange", "FirstURL": "https://duckduckgo.com/Kraken" }
                ]}
            ]
        });

        let (output, sources) = format_search_results("crypto", &data);
        assert!(output.contains("Related topics"));
        assert!(output.contains("Kraken - exchange"));
        assert_eq!(sources.len(), 2);
    }

    #[test]
    fn test_empty_response() {
        let (output, sources) = format_search_results("obscure", &json!({}));
        assert!(output.contains("No instant answer available"));
        assert!(sources.is_empty());
    }
}
