//! fax-core: fax-gateway Core Library
//!
//! Tool capability interface, tool registry, error taxonomy and
//! configuration shared by the fax tools and the gateway binary.

pub mod config;
pub mod error;
pub mod tool;

pub use config::{Config, FaxPlusConfig};
pub use error::{Error, Result};
pub use tool::{SchemaBuilder, Tool, ToolDefinition, ToolManager, ToolResult};
