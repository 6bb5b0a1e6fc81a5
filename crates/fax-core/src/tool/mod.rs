//! Tool system for agent tool invocation
//!
//! This module provides the capability interface and registry
//! through which an agent framework discovers and runs tools.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{SchemaBuilder, ToolDefinition};
pub use manager::{parse_arguments, ToolManager};
pub use traits::{Tool, ToolResult};
