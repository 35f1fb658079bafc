//! HTTP transport used by the API clients
//!
//! Clients talk to upstream APIs through the `HttpTransport` trait so the
//! fan-out and caching logic can be exercised against scripted responses.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while fetching a JSON document
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// Body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Issues a GET request and returns the decoded JSON body
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// `HttpTransport` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    /// Creates a transport with the default request timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to build http client; using defaults");
                Client::new()
            });
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        // reqwest errors print the request URL, which carries the API key.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Request(err.without_url()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| FetchError::Request(err.without_url()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: redact_url(url),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Masks credential query parameters so URLs can be logged
pub fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name == "token" || name == "api_key" => format!("{}=***", name),
            _ => pair.to_string(),
        })
        .collect();

    format!("{}?{}", base, params.join("&"))
}
