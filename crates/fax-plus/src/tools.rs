//! Fax tools for agent frameworks

use std::sync::Arc;

use async_trait::async_trait;
use fax_core::{SchemaBuilder, Tool, ToolResult};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::client::FaxApi;
use crate::credentials::Credentials;
use crate::types::{
    looks_like_e164, FaxDocument, FaxHistoryRequest, FaxStatusRequest, OutgoingFax,
    SendFaxRequest,
};

/// Default document size limit (20 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// First present field among `keys`, or null
fn field(payload: &Value, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|k| payload.get(*k))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Send fax tool
pub struct SendFaxTool {
    credentials: Credentials,
    api: Arc<dyn FaxApi>,
    max_file_size: u64,
}

impl SendFaxTool {
    pub fn new(credentials: Credentials, api: Arc<dyn FaxApi>) -> Self {
        Self {
            credentials,
            api,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }
}

#[async_trait]
impl Tool for SendFaxTool {
    fn name(&self) -> &str {
        "faxplus"
    }

    fn description(&self) -> &str {
        "Useful for sending faxes to a specified fax number. Input should be a JSON object with \
         fax_number (recipient in E.164 format, e.g. +14155552671), subject, file_path (PDF, TIFF \
         or other supported document) and an optional comment."
    }

    fn input_schema(&self) -> Value {
        SchemaBuilder::object_schema(vec![
            ("fax_number", "string", "Recipient fax number in E.164 format (e.g. +14155552671)", true),
            ("subject", "string", "Subject of the fax", true),
            ("file_path", "string", "Path to the file to be faxed (PDF, TIFF, or other supported format)", true),
            ("comment", "string", "Optional comment for the fax", false),
        ])
    }

    async fn execute(&self, input: Value) -> fax_core::Result<ToolResult> {
        let request = SendFaxRequest::from_input(input)?;

        if !looks_like_e164(&request.fax_number) {
            warn!(to = %request.fax_number, "Fax number does not look like E.164, passing through");
        }

        let document = FaxDocument::load(&request.file_path, self.max_file_size).await?;

        info!(to = %request.fax_number, file = %document.file_name, "Sending fax");

        let fax = OutgoingFax {
            recipient: request.fax_number.clone(),
            subject: request.subject.clone(),
            comment: request.comment,
            document,
        };
        let receipt = self.api.send_fax(&self.credentials, fax).await?;

        ToolResult::json(&json!({
            "status": receipt.status,
            "fax_id": receipt.id,
            "to": request.fax_number,
            "subject": request.subject,
            "message": format!("Fax successfully queued. Fax ID: {}", receipt.id)
        }))
    }
}

/// Fax status tool
pub struct FaxStatusTool {
    credentials: Credentials,
    api: Arc<dyn FaxApi>,
}

impl FaxStatusTool {
    pub fn new(credentials: Credentials, api: Arc<dyn FaxApi>) -> Self {
        Self { credentials, api }
    }
}

#[async_trait]
impl Tool for FaxStatusTool {
    fn name(&self) -> &str {
        "faxplus_status"
    }

    fn description(&self) -> &str {
        "Useful for checking the status of a previously sent fax. Input should be a JSON object \
         with fax_id, the ID returned when the fax was sent."
    }

    fn input_schema(&self) -> Value {
        SchemaBuilder::object_schema(vec![(
            "fax_id",
            "string",
            "The ID of the fax to check the status of",
            true,
        )])
    }

    async fn execute(&self, input: Value) -> fax_core::Result<ToolResult> {
        let request = FaxStatusRequest::from_input(input)?;

        let payload = self
            .api
            .get_fax_status(&self.credentials, &request.fax_id)
            .await?;

        ToolResult::json(&json!({
            "fax_id": request.fax_id,
            "status": field(&payload, &["status"]),
            "completed": field(&payload, &["completed"]),
            "cost": field(&payload, &["cost"]),
            "pagecount": field(&payload, &["pagecount", "page_count", "pages"]),
            "created_at": field(&payload, &["created_at", "submit_time"]),
            "details": payload
        }))
    }
}

/// Fax history tool
pub struct FaxHistoryTool {
    credentials: Credentials,
    api: Arc<dyn FaxApi>,
}

impl FaxHistoryTool {
    pub fn new(credentials: Credentials, api: Arc<dyn FaxApi>) -> Self {
        Self { credentials, api }
    }
}

/// Find the record array in a list response
fn history_records(payload: &Value) -> Vec<Value> {
    [
        payload.pointer("/data/records"),
        payload.get("data"),
        payload.get("records"),
    ]
    .into_iter()
    .flatten()
    .find_map(|v| v.as_array())
    .cloned()
    .unwrap_or_default()
}

#[async_trait]
impl Tool for FaxHistoryTool {
    fn name(&self) -> &str {
        "faxplus_history"
    }

    fn description(&self) -> &str {
        "Useful for listing recently sent and received faxes. Input should be a JSON object with \
         an optional limit (1-100, default 10)."
    }

    fn input_schema(&self) -> Value {
        SchemaBuilder::object_schema(vec![(
            "limit",
            "integer",
            "Maximum number of faxes to return (default: 10)",
            false,
        )])
    }

    async fn execute(&self, input: Value) -> fax_core::Result<ToolResult> {
        let limit = FaxHistoryRequest::limit_from_input(input)?;

        let payload = self.api.list_faxes(&self.credentials, limit).await?;

        let faxes: Vec<Value> = history_records(&payload)
            .iter()
            .map(|r| {
                json!({
                    "id": field(r, &["id"]),
                    "status": field(r, &["status"]),
                    "to": field(r, &["to", "to_number"]),
                    "date": field(r, &["date", "submit_time", "created_at"])
                })
            })
            .collect();

        ToolResult::json(&json!({
            "count": faxes.len(),
            "faxes": faxes
        }))
    }
}
