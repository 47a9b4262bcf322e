//! HTTP client for the message network API.
//!
//! # Responsibilities
//! - Submit signed messages and parse their acceptance status
//! - Query the message index (by hash or by filter, paginated)
//! - Upload files with their announcing STORE message
//! - Look up instance allocations on the scheduler
//!
//! Requests are never retried here; every request is bounded by the
//! configured timeout.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::client::source::MessageSource;
use crate::client::types::{
    BroadcastRequest, GetMessagesResponse, MessageFilter, MessageResponse, SchedulerAllocation,
    StoreFileResponse,
};
use crate::config::schema::ApiConfig;
use crate::error::{MessageError, MessageResult};
use crate::message::Message;
use crate::observability::metrics;

const MESSAGES_PATH: &str = "/api/v0/messages";
const MESSAGES_QUERY_PATH: &str = "/api/v0/messages.json";
const ADD_FILE_PATH: &str = "/api/v0/storage/add_file";
const ALLOCATION_PATH: &str = "/api/v0/allocation";

/// Longest response body excerpt kept in error messages.
const ERROR_BODY_LIMIT: usize = 256;

/// Network API client sharing one connection pool across calls.
#[derive(Clone)]
pub struct BroadcastClient {
    http: reqwest::Client,
    api_url: String,
    scheduler_url: String,
    timeout_duration: Duration,
}

impl BroadcastClient {
    /// Create a new client.
    ///
    /// Fails if either base URL is invalid.
    pub fn new(config: &ApiConfig) -> MessageResult<Self> {
        let api_url = parse_base_url(&config.api_url)?;
        let scheduler_url = parse_base_url(&config.scheduler_url)?;
        let timeout_duration = Duration::from_secs(config.request_timeout_secs);

        let http = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| MessageError::Network(format!("Failed to build HTTP client: {}", e)))?;

        tracing::debug!(api_url = %api_url, scheduler_url = %scheduler_url, "Network client initialized");

        Ok(Self {
            http,
            api_url,
            scheduler_url,
            timeout_duration,
        })
    }

    /// Submit a message.
    ///
    /// With `sync = true` the node answers once it has decided whether to
    /// accept the message; otherwise it answers right after intake.
    pub async fn submit(&self, message: &Message, sync: bool) -> MessageResult<MessageResponse> {
        let request = BroadcastRequest { message, sync };

        let response = self
            .http
            .post(format!("{}{}", self.api_url, MESSAGES_PATH))
            .header(ACCEPT, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("messages", e))?;

        let (http_status, body) = read_body("messages", response).await?;
        let parsed = decode_submission(http_status, &body)?;

        let status = parsed
            .message_status
            .unwrap_or(parsed.publication_status.status);
        metrics::record_submission(message.message_type, status.as_str());

        if parsed.is_rejected() {
            tracing::warn!(
                item_hash = %message.item_hash,
                message_type = %message.message_type,
                failed = ?parsed.publication_status.failed,
                "Message rejected"
            );
        } else {
            tracing::info!(
                item_hash = %message.item_hash,
                message_type = %message.message_type,
                status = %status,
                sync = sync,
                "Message submitted"
            );
        }

        Ok(parsed)
    }

    /// Upload a file together with the STORE message announcing it.
    pub async fn upload_file(
        &self,
        message: &Message,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> MessageResult<StoreFileResponse> {
        let size = bytes.len();
        let metadata = serde_json::to_string(&BroadcastRequest {
            message,
            sync: false,
        })?;

        let form = Form::new()
            .text("metadata", metadata)
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .http
            .post(format!("{}{}", self.api_url, ADD_FILE_PATH))
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error("add_file", e))?;

        let parsed: StoreFileResponse = read_json("add_file", response).await?;
        metrics::record_submission(message.message_type, parsed.status.as_str());

        tracing::info!(
            file_hash = %parsed.hash,
            item_hash = %message.item_hash,
            size = size,
            status = %parsed.status,
            "File uploaded"
        );

        Ok(parsed)
    }

    /// Look up where the scheduler placed an instance.
    pub async fn get_allocation(&self, hash: &str) -> MessageResult<SchedulerAllocation> {
        let response = self
            .http
            .get(format!("{}{}/{}", self.scheduler_url, ALLOCATION_PATH, hash))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error("allocation", e))?;

        read_json("allocation", response).await
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout_duration
    }

    /// Base URL of the message API.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl MessageSource for BroadcastClient {
    async fn get_messages(
        &self,
        filter: &MessageFilter,
        page: u64,
        size: u64,
    ) -> MessageResult<GetMessagesResponse> {
        let response = self
            .http
            .get(format!("{}{}", self.api_url, MESSAGES_QUERY_PATH))
            .header(ACCEPT, "application/json")
            .query(&filter.query_pairs(page, size))
            .send()
            .await
            .map_err(|e| transport_error("messages.json", e))?;

        read_json("messages.json", response).await
    }
}

impl std::fmt::Debug for BroadcastClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastClient")
            .field("api_url", &self.api_url)
            .field("scheduler_url", &self.scheduler_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

fn parse_base_url(raw: &str) -> MessageResult<String> {
    let url: url::Url = raw
        .parse()
        .map_err(|e| MessageError::Network(format!("Invalid URL '{}': {}", raw, e)))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn transport_error(endpoint: &'static str, e: reqwest::Error) -> MessageError {
    metrics::record_request_failure(endpoint);
    tracing::warn!(endpoint = endpoint, error = %e, "Request failed");
    MessageError::Network(format!("{} request failed: {}", endpoint, e))
}

/// Read a response body, then decode it.
///
/// Any non-2xx status is a network error, whatever the body says; a 2xx body
/// that does not decode is a serialization error.
async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> MessageResult<T> {
    let (status, body) = read_body(endpoint, response).await?;
    decode_body(endpoint, status, &body)
}

async fn read_body(
    endpoint: &'static str,
    response: reqwest::Response,
) -> MessageResult<(StatusCode, String)> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(endpoint, e))?;
    Ok((status, body))
}

fn decode_body<T: DeserializeOwned>(
    endpoint: &'static str,
    status: StatusCode,
    body: &str,
) -> MessageResult<T> {
    if !status.is_success() {
        return Err(status_error(endpoint, status, body));
    }

    serde_json::from_str(body).map_err(|e| {
        MessageError::Serialization(format!("Invalid {} response: {}", endpoint, e))
    })
}

/// Decode a submission answer.
///
/// The node reports rejected messages with an error status and a regular
/// submission body; that body is returned as-is so the caller sees the
/// rejection. Any other error status is a network error.
fn decode_submission(status: StatusCode, body: &str) -> MessageResult<MessageResponse> {
    if status.is_success() {
        return decode_body("messages", status, body);
    }

    match serde_json::from_str::<MessageResponse>(body) {
        Ok(parsed) if parsed.is_rejected() => Ok(parsed),
        _ => Err(status_error("messages", status, body)),
    }
}

fn status_error(endpoint: &'static str, status: StatusCode, body: &str) -> MessageError {
    metrics::record_request_failure(endpoint);
    tracing::warn!(endpoint = endpoint, status = %status, "Request returned error status");
    MessageError::Network(format!(
        "{} returned status {}: {}",
        endpoint,
        status,
        excerpt(body)
    ))
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            api_url: "http://localhost:4024/".to_string(),
            scheduler_url: "http://localhost:4025".to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = BroadcastClient::new(&test_config()).unwrap();
        assert_eq!(client.api_url(), "http://localhost:4024");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = test_config();
        config.api_url = "not a url".to_string();
        let result = BroadcastClient::new(&config);
        assert!(matches!(result, Err(MessageError::Network(_))));
    }

    #[test]
    fn test_excerpt_limits_length() {
        let long = "x".repeat(1000);
        assert_eq!(excerpt(&long).len(), ERROR_BODY_LIMIT);
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_error_status_with_json_body_is_network_error() {
        let body = r#"{"detail":"Service temporarily unavailable"}"#;
        let result: MessageResult<GetMessagesResponse> =
            decode_body("messages.json", StatusCode::SERVICE_UNAVAILABLE, body);

        match result {
            Err(MessageError::Network(msg)) => {
                assert!(msg.contains("503"));
                assert!(msg.contains("temporarily unavailable"));
            }
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_success_body_is_serialization_error() {
        let result: MessageResult<GetMessagesResponse> =
            decode_body("messages.json", StatusCode::OK, "not json");
        assert!(matches!(result, Err(MessageError::Serialization(_))));

        let result = decode_submission(StatusCode::OK, r#"{"publication_status":{}}"#);
        assert!(matches!(result, Err(MessageError::Serialization(_))));
    }

    #[test]
    fn test_rejection_body_survives_error_status() {
        let body = r#"{"publication_status":{"status":"rejected","failed":["p2p"]},"message_status":"rejected"}"#;
        let parsed = decode_submission(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap();
        assert!(parsed.is_rejected());

        let accepted = r#"{"publication_status":{"status":"success","failed":[]}}"#;
        let result = decode_submission(StatusCode::INTERNAL_SERVER_ERROR, accepted);
        assert!(matches!(result, Err(MessageError::Network(_))));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_network_error() {
        let mut config = test_config();
        // Port 9 (discard) is not expected to serve HTTP.
        config.api_url = "http://127.0.0.1:9".to_string();
        config.request_timeout_secs = 2;
        let client = BroadcastClient::new(&config).unwrap();

        let result = client.get_message_by_hash("abc").await;
        assert!(matches!(result, Err(MessageError::Network(_))));
    }
}
