//! Capability domain module
//!
//! Participants reach the outside world (search, scraping, market data)
//! only through the capability boundary. This module holds the pure
//! definitions; execution lives behind the application's `CapabilityPort`.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (request)    │    │ (response)   │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Models frequently invent tool names (`search` instead of `web_search`);
//! [`ToolSpec::resolve`] maps registered aliases back to canonical names.

pub mod entities;
pub mod parsing;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use parsing::{parse_tool_calls, strip_tool_blocks};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
