//! `market_quote`: latest price of a ticker from the Yahoo Finance chart
//! endpoint.

use crate::tools::http::send_json;
use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::time::Instant;

pub const MARKET_QUOTE: &str = "market_quote";

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub fn market_quote_definition() -> ToolDefinition {
    ToolDefinition::new(
        MARKET_QUOTE,
        "Get the latest market price of a stock or crypto ticker (e.g. BTC-USD, ETH-USD, AAPL).",
    )
    .with_parameter(
        ToolParameter::new("symbol", "Ticker symbol, crypto as <COIN>-USD", true)
            .with_type("string"),
    )
}

pub async fn execute_market_quote(client: &reqwest::Client, call: &ToolCall) -> ToolResult {
    let start = Instant::now();

    let symbol = match call.require_string("symbol") {
        Ok(s) => normalize_symbol(s),
        Err(e) => return ToolResult::failure(MARKET_QUOTE, ToolError::invalid_argument(e)),
    };
    if symbol.is_empty() {
        return ToolResult::failure(
            MARKET_QUOTE,
            ToolError::invalid_argument("symbol cannot be empty"),
        );
    }

    let url = format!("{}/{}", CHART_URL, symbol);
    let request = client
        .get(&url)
        .query(&[("range", "5d"), ("interval", "1d")]);
    let body = match send_json(MARKET_QUOTE, request).await {
        Ok(b) => b,
        Err(failed) => return failed,
    };

    match Quote::from_chart(&body) {
        Some(quote) => ToolResult::success(MARKET_QUOTE, quote.render())
            .with_duration(start.elapsed().as_millis() as u64)
            .with_sources([format!("https://finance.yahoo.com/quote/{}", quote.symbol)]),
        None => {
            let reason = body["chart"]["error"]["description"]
                .as_str()
                .unwrap_or("no quote data")
                .to_string();
            ToolResult::failure(
                MARKET_QUOTE,
                ToolError::execution_failed(format!("{}: {}", symbol, reason)),
            )
        }
    }
}

/// Upper-case, and map bare crypto names to their USD pair.
fn normalize_symbol(raw: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    match symbol.as_str() {
        "BITCOIN" | "BTC" => "BTC-USD".to_string(),
        "ETHEREUM" | "ETH" => "ETH-USD".to_string(),
        "SOLANA" | "SOL" => "SOL-USD".to_string(),
        _ => symbol,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Quote {
    symbol: String,
    currency: String,
    price: f64,
    previous_close: Option<f64>,
}

impl Quote {
    fn from_chart(body: &serde_json::Value) -> Option<Self> {
        let meta = &body["chart"]["result"][0]["meta"];
        Some(Self {
            symbol: meta["symbol"].as_str()?.to_string(),
            currency: meta["currency"].as_str().unwrap_or("USD").to_string(),
            price: meta["regularMarketPrice"].as_f64()?,
            previous_close: meta["chartPreviousClose"]
                .as_f64()
                .or_else(|| meta["previousClose"].as_f64()),
        })
    }

    fn change_pct(&self) -> Option<f64> {
        self.previous_close
            .filter(|p| *p > 0.0)
            .map(|p| (self.price - p) / p * 100.0)
    }

    fn render(&self) -> String {
        let mut out = format!(
            "## Quote: {}\n\nPrice: {:.2} {}",
            self.symbol, self.price, self.currency
        );
        if let (Some(prev), Some(pct)) = (self.previous_close, self.change_pct()) {
            out.push_str(&format!("\nPrevious close: {:.2} ({:+.2}%)", prev, pct));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_from_chart() {
        let body = json!({
            "chart": { "result": [{ "meta": {
                "symbol": "BTC-USD",
                "currency": "USD",
                "regularMarketPrice": 66000.0,
                "chartPreviousClose": 60000.0
            }}], "error": null }
        });
        let quote = Quote::from_chart(&body).unwrap();
        assert_eq!(quote.symbol, "BTC-USD");
        assert!((quote.change_pct().unwrap() - 10.0).abs() < 1e-9);

        let text = quote.render();
        assert!(text.contains("Price: 66000.00 USD"));
        assert!(text.contains("(+10.00%)"));
    }

    #[test]
    fn test_quote_missing_data() {
        let body = json!({
            "chart": { "result": null, "error": { "description": "No data found" } }
        });
        assert!(Quote::from_chart(&body).is_none());
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" bitcoin "), "BTC-USD");
        assert_eq!(normalize_symbol("eth"), "ETH-USD");
        assert_eq!(normalize_symbol("aapl"), "AAPL");
    }
}
