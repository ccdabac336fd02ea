use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::http::send_once;
use super::types::ModelsResponse;
use crate::error::TransportError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default client version (from Cargo.toml)
const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the User-Agent string
fn build_user_agent() -> String {
    std::env::var("AICHATTY_USER_AGENT")
        .unwrap_or_else(|_| format!("aichatty/{}", DEFAULT_VERSION))
}

/// API client for the OpenAI-compatible chat service
pub struct ApiClient {
    client: Client,
    user_agent: String,
}

impl ApiClient {
    /// Create a new API client whose requests time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agent: build_user_agent(),
        })
    }

    /// Join `endpoint` onto `base_url`, keeping any path prefix of the base.
    pub(super) fn build_url(base_url: &str, endpoint: &str) -> Result<Url, TransportError> {
        let trimmed = base_url.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{}/", trimmed)
        };

        let base = Url::parse(&normalized)
            .map_err(|_| TransportError::InvalidHost(base_url.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(TransportError::InvalidHost(base_url.to_string()));
        }

        base.join(endpoint)
            .map_err(|_| TransportError::InvalidHost(base_url.to_string()))
    }

    /// List the models served by `host`, authenticating with `api_key`.
    ///
    /// This is the cheapest authenticated endpoint of the API and doubles
    /// as the credential check.
    pub async fn list_models(
        &self,
        host: &str,
        api_key: &str,
    ) -> Result<ModelsResponse, TransportError> {
        let url = Self::build_url(host, "v1/models")?;

        debug!("=== API Request ===");
        debug!("URL: {}", url);

        let response = send_once(self.models_request(url, api_key)).await?;
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            TransportError::Service(format!("Unexpected response from {}: {}", host, e))
        })
    }

    fn models_request(&self, url: Url, api_key: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Authorization", format!("Bearer {}", api_key))
    }
}
