//! Capability adapters
//!
//! Concrete tools behind the application's `CapabilityPort`:
//!
//! | Tool | Backend | Needs |
//! |------|---------|-------|
//! | `web_search` | DuckDuckGo Instant Answer | `web-tools` feature |
//! | `web_fetch` | Any http(s) page | `web-tools` feature |
//! | `answer_search` | Perplexity-style answer engine | API key |
//! | `market_quote` | Yahoo Finance chart endpoint | - |
//! | `think` | Local scratchpad | - |

pub mod answer;
pub mod market;
pub mod think;
#[cfg(feature = "web-tools")]
pub mod web;

mod executor;
pub(crate) mod http;

pub use answer::AnswerEngine;
pub use executor::LocalCapabilityExecutor;
pub use http::DEFAULT_HTTP_TIMEOUT;

use roundtable_domain::tool::ToolSpec;

/// Register the aliases models tend to invent for the canonical names.
fn with_aliases(spec: ToolSpec) -> ToolSpec {
    spec.register_alias("search", "web_search")
        .register_alias("web", "web_search")
        .register_alias("fetch", "web_fetch")
        .register_alias("browse", "web_fetch")
        .register_alias("scrape", "web_fetch")
        .register_alias("ask", "answer_search")
        .register_alias("perplexity", "answer_search")
        .register_alias("quote", "market_quote")
        .register_alias("price", "market_quote")
}

/// Tools for the researcher role: search, read pages, check prices.
pub fn research_tool_spec() -> ToolSpec {
    let spec = ToolSpec::new()
        .register(market::market_quote_definition())
        .register(think::think_definition());
    #[cfg(feature = "web-tools")]
    let spec = spec
        .register(web::web_search_definition())
        .register(web::web_fetch_definition());
    with_aliases(spec)
}

/// Tools for the analyst role. `answer_search` is added by the executor
/// once an [`AnswerEngine`] is configured.
pub fn analysis_tool_spec() -> ToolSpec {
    with_aliases(
        ToolSpec::new()
            .register(market::market_quote_definition())
            .register(think::think_definition()),
    )
}
