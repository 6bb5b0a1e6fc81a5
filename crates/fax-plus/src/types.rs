//! Request and response types for the fax tools

use std::fmt;
use std::sync::LazyLock;

use mime::Mime;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FaxError, Result};

/// Default number of records returned by the history tool
pub const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Upper bound accepted for the history limit
pub const MAX_HISTORY_LIMIT: u32 = 100;

static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").expect("valid E.164 pattern"));

/// Loose E.164 check; spaces, dashes, dots and parentheses are ignored
pub fn looks_like_e164(number: &str) -> bool {
    let compact: String = number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    E164.is_match(&compact)
}

fn parse_input<T: DeserializeOwned>(input: Value) -> Result<T> {
    if !input.is_object() {
        return Err(FaxError::Validation(
            "Invalid JSON input. Please provide a valid JSON object.".to_string(),
        ));
    }
    serde_json::from_value(input)
        .map_err(|e| FaxError::Validation(format!("Invalid arguments: {}", e)))
}

/// Reject blank values; accepted values are kept exactly as given
fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FaxError::Validation(message.to_string()));
    }
    Ok(())
}

/// Arguments of the send tool
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendFaxRequest {
    /// Recipient in E.164 format, e.g. `+14155552671`
    #[serde(default, alias = "recipient_number")]
    pub fax_number: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl SendFaxRequest {
    /// Parse and validate tool input
    pub fn from_input(input: Value) -> Result<Self> {
        let request: Self = parse_input(input)?;
        request.validate()
    }

    /// Check required fields; values pass through unchanged
    pub fn validate(self) -> Result<Self> {
        require(&self.fax_number, "Recipient fax number is required")?;
        require(&self.subject, "Subject is required")?;
        require(&self.file_path, "File path is required")?;

        Ok(Self {
            comment: self.comment.filter(|c| !c.trim().is_empty()),
            ..self
        })
    }
}

/// Arguments of the status tool
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaxStatusRequest {
    #[serde(default)]
    pub fax_id: String,
}

impl FaxStatusRequest {
    pub fn from_input(input: Value) -> Result<Self> {
        let request: Self = parse_input(input)?;
        require(&request.fax_id, "Fax ID is required")?;
        Ok(request)
    }
}

/// Arguments of the history tool
#[derive(Debug, Clone, Deserialize)]
pub struct FaxHistoryRequest {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT as i64
}

impl FaxHistoryRequest {
    /// Parse tool input and return the validated limit
    pub fn limit_from_input(input: Value) -> Result<u32> {
        let request: Self = parse_input(input)?;
        match u32::try_from(request.limit) {
            Ok(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Ok(limit),
            _ => Err(FaxError::Validation(format!(
                "Limit must be between 1 and {}",
                MAX_HISTORY_LIMIT
            ))),
        }
    }
}

/// A local file resolved and read for upload
#[derive(Clone)]
pub struct FaxDocument {
    pub file_name: String,
    pub mime_type: Mime,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for FaxDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaxDocument")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type.as_ref())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the client needs to transmit one fax
#[derive(Debug, Clone)]
pub struct OutgoingFax {
    pub recipient: String,
    pub subject: String,
    pub comment: Option<String>,
    pub document: FaxDocument,
}

/// Identifier and status returned after submitting a fax
#[derive(Debug, Clone)]
pub struct FaxReceipt {
    pub id: String,
    pub status: String,
    /// Vendor payload as received
    pub raw: Value,
}
