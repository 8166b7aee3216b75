pub mod aggregator;
pub mod coerce;
pub mod providers;

pub use aggregator::CatalogAggregator;
pub use providers::{CatalogProvider, CurseProvider, FetchContext, ProviderError, TukuiProvider};

use crate::config::HttpConfig;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

/// HTTP client configuration shared by every provider
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout duration
    pub timeout: Duration,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpClientConfig {
    fn from(config: &HttpConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client from this configuration
    pub fn build_client(&self) -> Result<Client, ProviderError> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .gzip(true)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| ProviderError::Other(format!("Failed to create HTTP client: {e}")))
    }
}

/// GET a URL and decode the JSON body.
///
/// Transport failures, non-success statuses and undecodable bodies all map
/// to a [`ProviderError`]; nothing is retried.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    context: &FetchContext,
) -> Result<T, ProviderError> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .headers(headers)
        .timeout(context.timeout)
        .send()
        .await
        .map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            if e.is_timeout() {
                ProviderError::Timeout(context.timeout)
            } else if e.is_connect() {
                ProviderError::Network(format!("Connection failed: {e}"))
            } else {
                ProviderError::Network(format!("Request failed: {e}"))
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout(context.timeout)
        } else {
            ProviderError::Network(format!("Failed to read response: {e}"))
        }
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ProviderError::Decode(format!("{url}: {e}")))
}
