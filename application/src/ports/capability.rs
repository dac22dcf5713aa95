//! Capability boundary port
//!
//! Defines the interface participants use to reach external tools
//! (web search, page fetch, answer engines, market data).

use async_trait::async_trait;
use roundtable_domain::tool::{ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for capability invocation
///
/// Stateless per call. Implementations (adapters) live in the
/// infrastructure layer and must turn every failure into a failed
/// [`ToolResult`] rather than panicking.
#[async_trait]
pub trait CapabilityPort: Send + Sync {
    /// Get the specification of all available capabilities
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a capability is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get_resolved(name).is_some()
    }

    /// Get the definition of a specific capability
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    /// Get names of all available capabilities
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Invoke a capability
    async fn invoke(&self, call: &ToolCall) -> ToolResult;
}
