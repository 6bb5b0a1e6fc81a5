//! Error types for fax-core

use thiserror::Error;

/// Main error type for fax-core
///
/// Every tool failure surfaces to the agent framework as one of these.
/// `Validation` is raised locally and never reaches the network;
/// `Upstream` and `Transport` come from the vendor client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the failure was detected before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type alias for fax-core
pub type Result<T> = std::result::Result<T, Error>;
