//! OpenAI-compatible chat completions provider
//!
//! Serves OpenAI, DeepSeek, OpenRouter, Gemini's compatibility endpoint and
//! Perplexity. The API is stateless, so each session resends its full
//! history on every call.

mod adapter;
mod session;
mod types;

pub use adapter::OpenAiCompatProvider;
pub use session::OpenAiCompatSession;
