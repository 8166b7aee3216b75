use super::traits::{CatalogProvider, FetchContext, ProviderError};
use crate::catalog::{Addon, GameVersion, Source, Version};
use crate::client::coerce::{lenient_i64, lenient_u64};
use crate::client::{fetch_json, HttpClientConfig};
use crate::config::TukuiConfig;
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info};
use url::Url;

/// One Tukui API endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TukuiEndpoint {
    /// Addon list for one flavor (returns an array)
    Addons(GameVersion),
    /// The ElvUI project (returns a single object)
    ElvUi,
    /// The Tukui project (returns a single object)
    Tukui,
}

impl TukuiEndpoint {
    /// Every endpoint fetched during a run
    pub fn all() -> Vec<Self> {
        let mut endpoints: Vec<Self> = GameVersion::ALL.into_iter().map(Self::Addons).collect();
        endpoints.push(Self::ElvUi);
        endpoints.push(Self::Tukui);
        endpoints
    }

    /// Query parameter selecting this endpoint
    pub const fn query(self) -> (&'static str, &'static str) {
        match self {
            Self::Addons(GameVersion::Retail) => ("addons", "all"),
            Self::Addons(GameVersion::ClassicEra) => ("classic-addons", "all"),
            Self::Addons(GameVersion::ClassicTbc) => ("classic-tbc-addons", "all"),
            Self::ElvUi => ("ui", "elvui"),
            Self::Tukui => ("ui", "tukui"),
        }
    }

    /// Flavor every record from this endpoint belongs to
    pub const fn flavor(self) -> GameVersion {
        match self {
            Self::Addons(flavor) => flavor,
            Self::ElvUi | Self::Tukui => GameVersion::Retail,
        }
    }

    /// Whether the endpoint answers with an array rather than one object
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Addons(_))
    }
}

/// Addon record as published by the Tukui API
#[derive(Debug, Deserialize)]
struct TukuiAddon {
    #[serde(deserialize_with = "lenient_i64")]
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    small_desc: Option<String>,
    #[serde(deserialize_with = "lenient_u64")]
    downloads: u64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    patch: Option<String>,
    #[serde(default)]
    lastupdate: Option<String>,
}

impl TukuiAddon {
    fn into_addon(self, flavor: GameVersion) -> Addon {
        let mut addon = Addon::new(Source::Tukui, self.id, self.name.unwrap_or_default());
        addon.url = self.web_url.unwrap_or_default();
        addon.number_of_downloads = self.downloads;
        addon.summary = self.small_desc.unwrap_or_default();
        addon.categories = vec![self.category.unwrap_or_default()];
        addon.versions = vec![Version {
            flavor,
            game_version: self.patch.unwrap_or_default(),
            date: self.lastupdate.unwrap_or_default(),
        }];
        addon
    }
}

/// Tukui.org API provider
pub struct TukuiProvider {
    client: Client,
    base_url: String,
}

impl TukuiProvider {
    /// Create a new Tukui provider
    pub fn new(config: &TukuiConfig, http: &HttpClientConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http.build_client()?,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: TukuiEndpoint) -> Result<String, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Other(format!("Invalid base URL: {e}")))?;
        let (key, value) = endpoint.query();
        url.query_pairs_mut().append_pair(key, value);
        Ok(url.to_string())
    }

    async fn fetch_endpoint(
        &self,
        endpoint: TukuiEndpoint,
        context: &FetchContext,
    ) -> Result<Vec<Addon>, ProviderError> {
        let url = self.endpoint_url(endpoint)?;
        let flavor = endpoint.flavor();

        let records = if endpoint.is_list() {
            fetch_json::<Vec<TukuiAddon>>(&self.client, &url, HeaderMap::new(), context).await?
        } else {
            vec![fetch_json::<TukuiAddon>(&self.client, &url, HeaderMap::new(), context).await?]
        };

        debug!("Tukui {:?} returned {} addons", endpoint, records.len());
        Ok(records
            .into_iter()
            .map(|record| record.into_addon(flavor))
            .collect())
    }
}

#[async_trait]
impl CatalogProvider for TukuiProvider {
    fn name(&self) -> &str {
        "tukui"
    }

    fn source(&self) -> Source {
        Source::Tukui
    }

    async fn fetch_all(&self, context: &FetchContext) -> Result<Vec<Addon>, ProviderError> {
        let start_time = Instant::now();
        let endpoints = TukuiEndpoint::all();
        info!("Fetching {} Tukui endpoints", endpoints.len());

        // Joined over the same list that drives the fan-out.
        let results = try_join_all(
            endpoints
                .iter()
                .map(|&endpoint| self.fetch_endpoint(endpoint, context)),
        )
        .await?;

        let addons: Vec<Addon> = results.into_iter().flatten().collect();
        info!(
            "Tukui fetch completed: {} addons in {:?}",
            addons.len(),
            start_time.elapsed()
        );
        Ok(addons)
    }
}
