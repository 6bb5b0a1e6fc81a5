//! fax-plus: Fax.Plus tools for fax-gateway
//!
//! This crate provides fax sending, status and history tools backed by
//! the Fax.Plus REST API.

pub mod client;
pub mod credentials;
pub mod document;
pub mod error;
pub mod tools;
pub mod types;

pub use client::{FaxApi, FaxPlusClient};
pub use credentials::Credentials;
pub use error::{FaxError, Result};
pub use tools::{FaxHistoryTool, FaxStatusTool, SendFaxTool};
pub use types::{FaxDocument, FaxReceipt, OutgoingFax, SendFaxRequest};

use std::sync::Arc;

use fax_core::{FaxPlusConfig, ToolManager};

/// Register the Fax.Plus tools with the tool manager
///
/// All tools share one HTTP client and one set of credentials.
pub fn register_fax_tools(manager: &mut ToolManager, config: &FaxPlusConfig) -> Result<()> {
    let credentials = Credentials::from_config(config)?;
    let api: Arc<dyn FaxApi> = Arc::new(FaxPlusClient::from_config(config)?);

    manager.register(Arc::new(
        SendFaxTool::new(credentials.clone(), api.clone())
            .with_max_file_size(config.max_file_size_bytes()),
    ));
    manager.register(Arc::new(FaxStatusTool::new(credentials.clone(), api.clone())));
    manager.register(Arc::new(FaxHistoryTool::new(credentials, api)));

    Ok(())
}
