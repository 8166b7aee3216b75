use crate::catalog::Addon;
use crate::client::providers::{CatalogProvider, CurseProvider, FetchContext, TukuiProvider};
use crate::client::HttpClientConfig;
use crate::{Config, Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Runs every provider concurrently and merges their catalogs
pub struct CatalogAggregator {
    providers: Vec<Arc<dyn CatalogProvider>>,
    context: FetchContext,
}

impl CatalogAggregator {
    /// Create an aggregator with the CurseForge and Tukui providers
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClientConfig::from(&config.http);

        let curse = CurseProvider::new(&config.curse, &http).map_err(|source| Error::Provider {
            provider: "curse".to_string(),
            source,
        })?;
        let tukui = TukuiProvider::new(&config.tukui, &http).map_err(|source| Error::Provider {
            provider: "tukui".to_string(),
            source,
        })?;
        let providers: Vec<Arc<dyn CatalogProvider>> = vec![Arc::new(curse), Arc::new(tukui)];

        info!("Initialized catalog aggregator with {} providers", providers.len());

        Ok(Self::with_providers(
            providers,
            FetchContext {
                timeout: http.timeout,
            },
        ))
    }

    /// Create an aggregator over an explicit provider list
    pub fn with_providers(providers: Vec<Arc<dyn CatalogProvider>>, context: FetchContext) -> Self {
        Self { providers, context }
    }

    /// Names of the configured providers
    pub fn providers(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Fetch every provider and concatenate the results.
    ///
    /// The first provider failure aborts the remaining tasks and is returned;
    /// no partial catalog is produced. Records are not deduplicated across
    /// sources and the output order is unspecified.
    pub async fn run(&self) -> Result<Vec<Addon>> {
        let start_time = Instant::now();
        info!("Starting catalog run across {} providers", self.providers.len());

        let mut tasks = JoinSet::new();
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let context = self.context.clone();
            tasks.spawn(async move {
                let result = provider.fetch_all(&context).await;
                (provider.name().to_string(), result)
            });
        }

        let mut addons = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (provider, result) = joined?;
            match result {
                Ok(provider_addons) => {
                    info!("Provider {} returned {} addons", provider, provider_addons.len());
                    addons.extend(provider_addons);
                }
                Err(source) => {
                    error!("Provider {} failed: {}", provider, source);
                    // Dropping the set aborts whatever is still running.
                    return Err(Error::Provider { provider, source });
                }
            }
        }

        info!(
            "Catalog run completed: {} addons in {:?}",
            addons.len(),
            start_time.elapsed()
        );
        Ok(addons)
    }
}

/// Fetch the merged catalog for a validated configuration
pub async fn run(config: &Config) -> Result<Vec<Addon>> {
    config.validate()?;
    CatalogAggregator::new(config)?.run().await
}
