//! Fax.Plus REST API client
//!
//! Communicates with the Fax.Plus v3 API. One tool invocation maps to one
//! request sequence here; there are no retries.

use std::time::Duration;

use async_trait::async_trait;
use fax_core::FaxPlusConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::credentials::Credentials;
use crate::error::{FaxError, Result};
use crate::types::{FaxDocument, FaxReceipt, OutgoingFax};

/// Operations the fax tools need from the vendor
///
/// Credentials are passed on every call so one client can serve any
/// number of tool instances.
#[async_trait]
pub trait FaxApi: Send + Sync {
    /// Upload the document and submit it for transmission
    ///
    /// Takes the fax by value so the document buffer moves into the upload.
    async fn send_fax(&self, credentials: &Credentials, fax: OutgoingFax) -> Result<FaxReceipt>;

    /// Fetch the current status of an outgoing fax
    async fn get_fax_status(&self, credentials: &Credentials, fax_id: &str) -> Result<Value>;

    /// List the most recent faxes on the account
    async fn list_faxes(&self, credentials: &Credentials, limit: u32) -> Result<Value>;
}

/// Fax.Plus API client
#[derive(Debug, Clone)]
pub struct FaxPlusClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    path: String,
}

#[derive(Debug, Serialize)]
struct OutboxPayload<'a> {
    to: Vec<&'a str>,
    files: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<OutboxComment<'a>>,
    options: OutboxOptions<'a>,
}

#[derive(Debug, Serialize)]
struct OutboxComment<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct OutboxOptions<'a> {
    cover_page: CoverPage<'a>,
}

#[derive(Debug, Serialize)]
struct CoverPage<'a> {
    subject: &'a str,
}

impl FaxPlusClient {
    /// Create a new client; `timeout` of `None` leaves timeouts to the caller
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: "https://restapi.fax.plus/v3".to_string(),
        })
    }

    pub fn from_config(config: &FaxPlusConfig) -> Result<Self> {
        Ok(Self::new(config.timeout_secs.map(Duration::from_secs))?
            .with_base_url(config.base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build `{base_url}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FaxError::Config(format!("Invalid base URL '{}': {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| FaxError::Config(format!("Invalid base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Pass non-success responses through with their body intact
    async fn check(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await?;
        error!(status = %status, body = %message, "{} failed", action);
        Err(FaxError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Upload a document, returning the storage path Fax.Plus assigned
    async fn upload_file(&self, credentials: &Credentials, document: FaxDocument) -> Result<String> {
        let url = self.endpoint(&["accounts", credentials.account_id(), "files"])?;

        debug!(file = %document.file_name, len = document.bytes.len(), "Uploading fax document");

        let FaxDocument {
            file_name,
            mime_type,
            bytes,
        } = document;
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_type.as_ref())?;
        let form = Form::new().part("fax_file", part);

        let response = self
            .client
            .post(url)
            .bearer_auth(credentials.api_key())
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = Self::check(response, "File upload")
            .await?
            .json()
            .await
            .map_err(|e| FaxError::InvalidResponse(e.to_string()))?;

        Ok(upload.path)
    }

    async fn get_json(&self, credentials: &Credentials, url: Url, action: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .bearer_auth(credentials.api_key())
            .send()
            .await?;

        Self::check(response, action)
            .await?
            .json()
            .await
            .map_err(|e| FaxError::InvalidResponse(e.to_string()))
    }
}

/// Pull the fax id for `recipient` out of an outbox response
///
/// Fax.Plus answers with `{"ids": {"<number>": "<id>"}}`; a flat `id`
/// is accepted as well.
fn receipt_id(payload: &Value, recipient: &str) -> Option<String> {
    let ids = payload.get("ids");
    ids.and_then(|ids| ids.get(recipient))
        .or_else(|| ids.and_then(|ids| ids.as_object()).and_then(|m| m.values().next()))
        .or_else(|| payload.get("id"))
        .and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[async_trait]
impl FaxApi for FaxPlusClient {
    async fn send_fax(&self, credentials: &Credentials, fax: OutgoingFax) -> Result<FaxReceipt> {
        let OutgoingFax {
            recipient,
            subject,
            comment,
            document,
        } = fax;
        let file_path = self.upload_file(credentials, document).await?;

        let url = self.endpoint(&["accounts", credentials.account_id(), "outbox"])?;
        let payload = OutboxPayload {
            to: vec![recipient.as_str()],
            files: vec![file_path.as_str()],
            comment: comment.as_deref().map(|text| OutboxComment { text }),
            options: OutboxOptions {
                cover_page: CoverPage {
                    subject: subject.as_str(),
                },
            },
        };

        debug!(to = %recipient, "Submitting fax to outbox");

        let response = self
            .client
            .post(url)
            .bearer_auth(credentials.api_key())
            .json(&payload)
            .send()
            .await?;

        let raw: Value = Self::check(response, "Send fax")
            .await?
            .json()
            .await
            .map_err(|e| FaxError::InvalidResponse(e.to_string()))?;

        let id = receipt_id(&raw, &recipient).ok_or_else(|| {
            FaxError::InvalidResponse("response did not include a fax id".to_string())
        })?;
        let status = raw
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("queued")
            .to_string();

        info!(fax_id = %id, to = %recipient, "Fax queued");
        Ok(FaxReceipt { id, status, raw })
    }

    async fn get_fax_status(&self, credentials: &Credentials, fax_id: &str) -> Result<Value> {
        let url = self.endpoint(&["accounts", credentials.account_id(), "outbox", fax_id])?;
        debug!(fax_id = %fax_id, "Fetching fax status");
        self.get_json(credentials, url, "Get fax status").await
    }

    async fn list_faxes(&self, credentials: &Credentials, limit: u32) -> Result<Value> {
        let mut url = self.endpoint(&["accounts", credentials.account_id(), "faxes"])?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        debug!(limit = limit, "Listing faxes");
        self.get_json(credentials, url, "List faxes").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> FaxPlusClient {
        FaxPlusClient::new(None)
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn credentials() -> Credentials {
        Credentials::new("test-api-key", "self").unwrap()
    }

    fn outgoing() -> OutgoingFax {
        OutgoingFax {
            recipient: "+14155552671".to_string(),
            subject: "Monthly Report".to_string(),
            comment: Some("Q3 numbers".to_string()),
            document: FaxDocument {
                file_name: "report.pdf".to_string(),
                mime_type: mime::APPLICATION_PDF,
                bytes: b"%PDF-1.4".to_vec(),
            },
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = test_client("https://restapi.fax.plus/v3");
        let url = client.endpoint(&["accounts", "self", "outbox", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://restapi.fax.plus/v3/accounts/self/outbox/a%2Fb");
    }

    #[test]
    fn test_receipt_id() {
        let payload = json!({"ids": {"+14155552671": "abc"}});
        assert_eq!(receipt_id(&payload, "+14155552671").as_deref(), Some("abc"));
        assert_eq!(receipt_id(&payload, "+10000000000").as_deref(), Some("abc"));
        assert_eq!(receipt_id(&json!({"id": 123}), "x").as_deref(), Some("123"));
        assert!(receipt_id(&json!({}), "x").is_none());
    }

    #[tokio::test]
    async fn send_fax_uploads_then_submits() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts/self/files"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"path": "/storage/report.tiff"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/accounts/self/outbox"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(json!({
                "to": ["+14155552671"],
                "files": ["/storage/report.tiff"],
                "comment": {"text": "Q3 numbers"},
                "options": {"cover_page": {"subject": "Monthly Report"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ids": {"+14155552671": "123"}})))
            .expect(1)
            .mount(&server)
            .await;

        let receipt = test_client(&server.uri())
            .send_fax(&credentials(), outgoing())
            .await
            .unwrap();

        assert_eq!(receipt.id, "123");
        assert_eq!(receipt.status, "queued");
    }

    #[tokio::test]
    async fn send_fax_upload_failure_is_passed_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accounts/self/files"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_token"}"#))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/accounts/self/outbox"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .send_fax(&credentials(), outgoing())
            .await
            .unwrap_err();

        match err {
            FaxError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, r#"{"error":"invalid_token"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_fax_status_returns_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts/self/outbox/123"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "123", "status": "delivered"})))
            .mount(&server)
            .await;

        let payload = test_client(&server.uri())
            .get_fax_status(&credentials(), "123")
            .await
            .unwrap();

        assert_eq!(payload["status"], "delivered");
    }

    #[tokio::test]
    async fn get_fax_status_unknown_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts/self/outbox/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("fax not found"))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .get_fax_status(&credentials(), "missing")
            .await
            .unwrap_err();

        assert!(matches!(err, FaxError::Api { status: 404, ref message } if message == "fax not found"));
    }

    #[tokio::test]
    async fn list_faxes_sends_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/accounts/self/faxes"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"records": []}})))
            .mount(&server)
            .await;

        let payload = test_client(&server.uri())
            .list_faxes(&credentials(), 2)
            .await
            .unwrap();

        assert_eq!(payload["data"]["records"], json!([]));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        // 接続できないポート
        let client = test_client("http://127.0.0.1:1");
        let err = client.get_fax_status(&credentials(), "123").await.unwrap_err();
        assert!(matches!(err, FaxError::Http(_)));
    }

    #[tokio::test]
    async fn truncated_error_body_is_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // 本文が途中で切れる 500 応答
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
                .await;
            let _ = socket.shutdown().await;
        });

        let client = test_client(&format!("http://{}", addr));
        let err = client.get_fax_status(&credentials(), "123").await.unwrap_err();
        assert!(matches!(err, FaxError::Http(_)), "got {err:?}");

        let err: fax_core::Error = err.into();
        assert!(matches!(err, fax_core::Error::Transport(_)));
    }
}
