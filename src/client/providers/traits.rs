use crate::catalog::{Addon, Source};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Context shared by every request a provider issues during one run
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Upper bound for a single HTTP request
    pub timeout: Duration,
}

impl Default for FetchContext {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Errors that can occur while fetching from a provider.
///
/// Every variant is fatal to the run; there are no retries.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider error: {0}")]
    Other(String),
}

/// Trait for upstream addon catalogs
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Unique name/identifier for this provider
    fn name(&self) -> &str;

    /// Tag stamped on every addon this provider emits
    fn source(&self) -> Source;

    /// Fetch and normalize every addon the provider lists
    async fn fetch_all(&self, context: &FetchContext) -> Result<Vec<Addon>, ProviderError>;
}
