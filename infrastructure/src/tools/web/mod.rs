//! Web capabilities (`web-tools` feature)
//!
//! | Tool | Description | Dependency |
//! |------|-------------|------------|
//! | `web_search` | DuckDuckGo Instant Answer lookup | `reqwest` |
//! | `web_fetch` | Fetch a URL, extract readable text from HTML | `reqwest` + `scraper` |

mod fetch;
mod search;

pub use fetch::{WEB_FETCH, execute_web_fetch, html_to_text, web_fetch_definition};
pub use search::{WEB_SEARCH, execute_web_search, web_search_definition};
