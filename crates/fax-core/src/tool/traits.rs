//! Tool trait definition
//!
//! Defines the capability interface every agent-facing adapter implements.
//! The orchestrating framework depends only on this trait.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::Result;

/// Tool execution result
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Output string from tool execution (usually serialized JSON)
    pub output: String,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Create a successful tool result from a JSON value
    pub fn json(value: &JsonValue) -> Result<Self> {
        Ok(Self::success(serde_json::to_string_pretty(value)?))
    }
}

/// Tool trait for agent tool invocation
///
/// Implement this trait to expose an operation to an agent framework.
/// `execute` receives the already-parsed JSON argument object.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (used by the framework's tool selection)
    fn name(&self) -> &str;

    /// Get the natural-language tool description
    fn description(&self) -> &str;

    /// Get the JSON schema for the tool's input parameters
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given input
    ///
    /// # Arguments
    /// * `input` - JSON object containing the tool input parameters
    ///
    /// # Errors
    /// Validation, upstream and transport failures are returned as `Err`
    /// so the caller can report them; nothing is retried.
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}
