//! `web_fetch`: download one page and extract its readable text.

use crate::tools::http::truncate;
use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Instant;

pub const WEB_FETCH: &str = "web_fetch";

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default cap on the extracted text handed back to the model (20 KB)
const DEFAULT_MAX_TEXT: usize = 20 * 1024;

const SKIP_TAGS: [&str; 6] = ["script", "style", "noscript", "svg", "nav", "footer"];

pub fn web_fetch_definition() -> ToolDefinition {
    ToolDefinition::new(
        WEB_FETCH,
        "Fetch a web page and return its readable text. Use it to read articles found by a search.",
    )
    .with_parameter(ToolParameter::new("url", "The URL to fetch", true).with_type("string"))
    .with_parameter(
        ToolParameter::new(
            "max_length",
            "Maximum length of the extracted text in bytes (default: 20480)",
            false,
        )
        .with_type("number"),
    )
}

pub async fn execute_web_fetch(client: &reqwest::Client, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let url = match call.require_string("url") {
        Ok(u) => u,
        Err(e) => return ToolResult::failure(WEB_FETCH, ToolError::invalid_argument(e)),
    };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return ToolResult::failure(
            WEB_FETCH,
            ToolError::invalid_argument(format!("Not an http(s) URL: {}", url)),
        );
    }
    let max_length = call
        .get_i64("max_length")
        .filter(|n| *n > 0)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_MAX_TEXT);

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            return ToolResult::failure(WEB_FETCH, ToolError::timeout(url));
        }
        Err(e) => {
            return ToolResult::failure(
                WEB_FETCH,
                ToolError::execution_failed(format!("Failed to fetch URL: {}", e)),
            );
        }
    };

    let status = response.status();
    if !status.is_success() {
        return ToolResult::failure(
            WEB_FETCH,
            ToolError::execution_failed(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )),
        );
    }
    if response.content_length().unwrap_or(0) > MAX_BODY_SIZE as u64 {
        return ToolResult::failure(
            WEB_FETCH,
            ToolError::execution_failed(format!("Response larger than {} bytes", MAX_BODY_SIZE)),
        );
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = match response.bytes().await {
        Ok(b) if b.len() > MAX_BODY_SIZE => {
            return ToolResult::failure(
                WEB_FETCH,
                ToolError::execution_failed(format!("Response too large: {} bytes", b.len())),
            );
        }
        Ok(b) => b,
        Err(e) => {
            return ToolResult::failure(
                WEB_FETCH,
                ToolError::execution_failed(format!("Failed to read response body: {}", e)),
            );
        }
    };

    let raw = String::from_utf8_lossy(&body);
    let text = if content_type.contains("html") {
        html_to_text(&raw)
    } else {
        raw.into_owned()
    };

    let output = format!("## Fetched: {}\n\n{}", url, truncate(&text, max_length));
    ToolResult::success(WEB_FETCH, output)
        .with_duration(start.elapsed().as_millis() as u64)
        .with_bytes(body.len())
        .with_sources([url])
}

/// Extract readable text from HTML, skipping scripts, styles and page chrome.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut parts = Vec::new();
    collect_text(root, &mut parts);
    clean_whitespace(&parts.join(" "))
}

fn collect_text(element: ElementRef, parts: &mut Vec<String>) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let t = text.trim();
                if !t.is_empty() {
                    parts.push(t.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(el, parts);
                }
            }
            _ => {}
        }
    }
}

/// Collapse runs of spaces; keep at most one blank line.
fn clean_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    let mut in_space = false;

    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
            in_space = true;
        } else if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
            newlines = 0;
        } else {
            out.push(ch);
            in_space = false;
            newlines = 0;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_keeps_article_text() {
        let html = "<html><body><nav>Home | Markets</nav><h1>BTC rallies</h1>\
            <p>Prices rose 5%.</p><footer>Cookies</footer></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("BTC rallies"));
        assert!(text.contains("Prices rose 5%."));
        assert!(!text.contains("Markets"));
        assert!(!text.contains("Cookies"));
    }

    #[test]
    fn test_html_to_text_strips_script_and_style() {
        let html = r#"<html><body>
            <script>var x = 1;</script>
            <style>.foo { color: red; }</style>
            <p>Visible text</p>
        </body></html>"#;
        let text = html_to_text(html);
        assert_eq!(text, "Visible text");
    }

    #[test]
    fn test_html_to_text_empty() {
        assert!(html_to_text("").trim().is_empty());
    }

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  hello   world  "), "hello world");
        assert_eq!(clean_whitespace("a\n\n\n\nb"), "a\n\nb");
    }

    #[tokio::test]
    async fn test_rejects_non_http_url() {
        let client = reqwest::Client::new();
        let call = ToolCall::new(WEB_FETCH).with_arg("url", "file:///etc/passwd");
        let result = execute_web_fetch(&client, &call).await;
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
