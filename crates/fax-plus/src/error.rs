//! Error types for fax-plus

use thiserror::Error;

/// fax-plus error type
#[derive(Error, Debug)]
pub enum FaxError {
    /// Bad or missing input, detected before any network call
    #[error("{0}")]
    Validation(String),

    /// Non-success response from Fax.Plus; `message` is the response body as received
    #[error("Fax.Plus API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response from Fax.Plus: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FaxError {
    fn from(err: reqwest::Error) -> Self {
        FaxError::Http(err.to_string())
    }
}

impl From<FaxError> for fax_core::Error {
    fn from(err: FaxError) -> Self {
        match err {
            FaxError::Validation(msg) => fax_core::Error::Validation(msg),
            FaxError::Api { status, message } => fax_core::Error::Upstream { status, message },
            FaxError::Http(msg) => fax_core::Error::Transport(msg),
            FaxError::InvalidResponse(msg) => {
                fax_core::Error::ToolExecution(format!("Invalid response from Fax.Plus: {}", msg))
            }
            FaxError::Config(msg) => fax_core::Error::Config(msg),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, FaxError>;
