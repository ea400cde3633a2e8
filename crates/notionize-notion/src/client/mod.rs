//! Notion REST API client.
//!
//! Sync HTTP client for the public Notion API with integration token
//! authentication.

mod blocks;
mod pages;

use std::time::Duration;

use notionize_blocks::Block;
use serde_json::Value;
use tracing::debug;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::NotionApi;
use crate::error::NotionError;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Notion REST API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
    token: String,
}

impl NotionClient {
    /// Create client with the default timeout.
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_timeout(base_url, token, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create client with a per-attempt timeout.
    pub fn with_timeout(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }

    /// Create client from plugin configuration.
    pub fn from_config(config: &notionize_config::NotionConfig) -> Self {
        Self::with_timeout(&config.api_url, &config.notion_token, config.timeout())
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a JSON request and decode the JSON response.
    fn send(
        &self,
        request: RequestBuilder<WithBody>,
        payload: &Value,
    ) -> Result<Value, NotionError> {
        let payload_bytes = serde_json::to_vec(payload)?;

        let response = request
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Notion-Version", NOTION_VERSION)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        debug!(status, "Notion API response");

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(NotionError::RateLimited { retry_after });
        }

        let mut body_reader = response.into_body();
        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(NotionError::Http {
                status,
                body: error_body,
            });
        }

        let body = body_reader.read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl NotionApi for NotionClient {
    fn create_page(&self, parent_id: &str, title: &str) -> Result<String, NotionError> {
        self.create_child_page(parent_id, title)
    }

    fn append_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), NotionError> {
        self.append_children(page_id, blocks)
    }
}

/// Parse a `Retry-After` value given in seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then(|| Duration::from_secs_f64(seconds))
}
