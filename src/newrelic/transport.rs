//! HTTP transport for NerdGraph.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::{GraphQlRequest, NerdGraphResponse};
use super::NerdGraphTransport;
use crate::config::Config;
use crate::error::{NewRelicError, Result};

/// Header carrying the New Relic user API key.
const API_KEY_HEADER: &str = "API-Key";

/// NerdGraph transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    api_key: String,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Creates a transport for the endpoint and credentials in `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NewRelicError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Returns the endpoint this transport posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Maps a request failure (no response received) to a transport error.
    fn request_error(&self, error: &reqwest::Error) -> NewRelicError {
        if error.is_timeout() {
            NewRelicError::transport(format!(
                "request timed out after {}s ({error})",
                self.timeout_secs
            ))
        } else if error.is_connect() {
            NewRelicError::transport(format!(
                "could not connect to {} ({error})",
                self.endpoint
            ))
        } else {
            NewRelicError::transport(error.to_string())
        }
    }
}

#[async_trait]
impl NerdGraphTransport for HttpTransport {
    async fn post(&self, request: &GraphQlRequest) -> Result<NerdGraphResponse> {
        debug!(endpoint = %self.endpoint, "Posting NerdGraph request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NewRelicError::transport(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(if body.is_empty() {
                NewRelicError::transport(format!("HTTP {status}"))
            } else {
                NewRelicError::transport(format!("HTTP {status} - {body}"))
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| NewRelicError::transport(format!("invalid response body: {e}")))
    }
}
