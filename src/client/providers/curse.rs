use super::traits::{CatalogProvider, FetchContext, ProviderError};
use crate::catalog::{classify_flavor, Addon, GameVersion, Source, Version};
use crate::client::coerce::lenient_u64;
use crate::client::{fetch_json, HttpClientConfig};
use crate::config::CurseConfig;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use std::collections::btree_map::{BTreeMap, Entry};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

const API_KEY_HEADER: &str = "x-api-key";

/// One page of the mod search endpoint
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Mod>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Links {
    website_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    name: String,
}

/// Full metadata for a recent file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct File {
    id: i64,
    #[serde(default)]
    file_date: Option<DateTime<Utc>>,
}

/// Compact per-flavor pointer to a recent file. Carries no timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileIndex {
    /// Game version string the file targets
    #[serde(default)]
    pub game_version: String,
    /// Upstream file id; higher ids are newer uploads
    pub file_id: i64,
    /// Release-type code (1 release, 2 beta, 3 alpha)
    pub release_type: i64,
    /// Version-type code, classified into a flavor
    #[serde(default)]
    pub game_version_type_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Mod {
    id: i64,
    name: String,
    #[serde(default)]
    links: Links,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    download_count: u64,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    latest_files: Vec<File>,
    #[serde(default)]
    latest_files_indexes: Vec<FileIndex>,
}

/// Upstream release channel of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Release,
    Beta,
    Alpha,
}

impl ReleaseType {
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Release),
            2 => Some(Self::Beta),
            3 => Some(Self::Alpha),
            _ => None,
        }
    }

    /// Only release and beta files make it into the catalog
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Release | Self::Beta)
    }
}

/// The newest accepted file for one flavor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlavorCandidate {
    pub flavor: GameVersion,
    pub file_id: i64,
    pub game_version: String,
}

/// Pick the newest release or beta file per flavor.
///
/// Newest means the greatest file id. Entries with another release type or
/// an unknown version-type code are skipped. Output is ordered by flavor.
pub fn latest_per_flavor(indexes: &[FileIndex]) -> Vec<FlavorCandidate> {
    let mut latest: BTreeMap<GameVersion, FlavorCandidate> = BTreeMap::new();

    for index in indexes {
        if !ReleaseType::from_code(index.release_type).is_some_and(ReleaseType::is_accepted) {
            continue;
        }

        let flavor = match classify_flavor(index.game_version_type_id.unwrap_or_default()) {
            Ok(flavor) => flavor,
            Err(miss) => {
                warn!("Skipping CurseForge file {}: {}", index.file_id, miss);
                continue;
            }
        };

        let candidate = FlavorCandidate {
            flavor,
            file_id: index.file_id,
            game_version: index.game_version.clone(),
        };
        match latest.entry(flavor) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if candidate.file_id > slot.get().file_id {
                    slot.insert(candidate);
                }
            }
        }
    }

    latest.into_values().collect()
}

impl Mod {
    fn into_addon(self) -> Addon {
        let versions = latest_per_flavor(&self.latest_files_indexes)
            .into_iter()
            .map(|candidate| {
                // No matching detail entry leaves the date empty.
                let date = self
                    .latest_files
                    .iter()
                    .find(|file| file.id == candidate.file_id)
                    .and_then(|file| file.file_date)
                    .map(|date| date.to_rfc3339_opts(SecondsFormat::Secs, true))
                    .unwrap_or_default();

                Version {
                    flavor: candidate.flavor,
                    game_version: candidate.game_version,
                    date,
                }
            })
            .collect();

        let mut addon = Addon::new(Source::Curse, self.id, self.name);
        addon.url = self.links.website_url.unwrap_or_default();
        addon.number_of_downloads = self.download_count;
        addon.summary = self.summary.unwrap_or_default();
        addon.categories = self.categories.into_iter().map(|c| c.name).collect();
        addon.versions = versions;
        addon
    }
}

/// CurseForge mod search provider
pub struct CurseProvider {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    game_id: u32,
    page_size: usize,
}

impl CurseProvider {
    /// Create a new CurseForge provider
    pub fn new(config: &CurseConfig, http: &HttpClientConfig) -> Result<Self, ProviderError> {
        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ProviderError::Other(format!("Invalid API key: {e}")))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        Ok(Self {
            client: http.build_client()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
            game_id: config.game_id,
            page_size: config.page_size,
        })
    }

    /// Build the search URL for the page starting at `index`
    fn search_url(&self, index: usize) -> Result<String, ProviderError> {
        let mut url = Url::parse(&format!("{}/v1/mods/search", self.base_url))
            .map_err(|e| ProviderError::Other(format!("Invalid base URL: {e}")))?;

        url.query_pairs_mut()
            .append_pair("gameId", &self.game_id.to_string())
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("index", &index.to_string());

        Ok(url.to_string())
    }
}

#[async_trait]
impl CatalogProvider for CurseProvider {
    fn name(&self) -> &str {
        "curse"
    }

    fn source(&self) -> Source {
        Source::Curse
    }

    async fn fetch_all(&self, context: &FetchContext) -> Result<Vec<Addon>, ProviderError> {
        let start_time = Instant::now();
        info!("Fetching CurseForge mods (page size {})", self.page_size);

        let mut addons = Vec::new();
        let mut index = 0;
        let mut pages = 0;

        loop {
            let url = self.search_url(index)?;
            let page: SearchResponse =
                fetch_json(&self.client, &url, self.headers.clone(), context).await?;
            pages += 1;

            let count = page.data.len();
            debug!("CurseForge page {} at index {} returned {} mods", pages, index, count);
            addons.extend(page.data.into_iter().map(Mod::into_addon));

            // A short page marks the end of the results.
            if count < self.page_size {
                break;
            }
            index += self.page_size;
        }

        info!(
            "CurseForge fetch completed: {} addons from {} pages in {:?}",
            addons.len(),
            pages,
            start_time.elapsed()
        );
        Ok(addons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index(file_id: i64, release_type: i64, type_id: i64) -> FileIndex {
        FileIndex {
            game_version: format!("v{file_id}"),
            file_id,
            release_type,
            game_version_type_id: Some(type_id),
        }
    }

    fn decode_mod(value: serde_json::Value) -> Addon {
        serde_json::from_value::<Mod>(value).unwrap().into_addon()
    }

    #[test]
    fn test_highest_file_id_wins() {
        let picked = latest_per_flavor(&[index(100, 1, 517), index(300, 2, 517), index(200, 1, 517)]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].flavor, GameVersion::Retail);
        assert_eq!(picked[0].file_id, 300);
        assert_eq!(picked[0].game_version, "v300");
    }

    #[test]
    fn test_one_candidate_per_flavor() {
        let picked = latest_per_flavor(&[
            index(5, 1, 73246),
            index(4, 1, 67408),
            index(3, 1, 517),
            index(9, 2, 73246),
        ]);
        let flavors: Vec<_> = picked.iter().map(|c| c.flavor).collect();
        assert_eq!(
            flavors,
            vec![GameVersion::Retail, GameVersion::ClassicEra, GameVersion::ClassicTbc]
        );
        assert_eq!(picked[2].file_id, 9);
    }

    #[test]
    fn test_alpha_and_unknown_release_types_are_excluded() {
        let picked = latest_per_flavor(&[index(10, 1, 517), index(20, 3, 517), index(30, 4, 517)]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].file_id, 10);
    }

    #[test]
    fn test_unknown_version_type_is_skipped() {
        let mut missing = index(50, 1, 0);
        missing.game_version_type_id = None;
        assert!(latest_per_flavor(&[index(40, 1, 999), missing]).is_empty());
    }

    #[test]
    fn test_mod_maps_to_addon_with_latest_retail_date() {
        let addon = decode_mod(json!({
            "id": 3358,
            "name": "Deadly Boss Mods",
            "links": {"websiteUrl": "https://www.curseforge.com/wow/addons/deadly-boss-mods"},
            "summary": "Raid warnings",
            "downloadCount": 123456789.0,
            "categories": [{"name": "Boss Encounters"}, {"name": "Combat"}],
            "latestFiles": [
                {"id": 100, "fileDate": "2021-06-01T10:00:00.123Z"},
                {"id": 200, "fileDate": "2021-06-29T14:22:41.19Z"}
            ],
            "latestFilesIndexes": [
                {"gameVersion": "9.0.5", "fileId": 100, "releaseType": 1, "gameVersionTypeId": 517},
                {"gameVersion": "9.1.0", "fileId": 200, "releaseType": 1, "gameVersionTypeId": 517}
            ]
        }));

        assert_eq!(addon.id, 3358);
        assert_eq!(addon.source(), Source::Curse);
        assert_eq!(addon.number_of_downloads, 123_456_789);
        assert_eq!(addon.url, "https://www.curseforge.com/wow/addons/deadly-boss-mods");
        assert_eq!(addon.categories, vec!["Boss Encounters", "Combat"]);
        assert_eq!(
            addon.versions,
            vec![Version {
                flavor: GameVersion::Retail,
                game_version: "9.1.0".to_string(),
                date: "2021-06-29T14:22:41Z".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_detail_entry_leaves_date_empty() {
        let addon = decode_mod(json!({
            "id": 1,
            "name": "Orphan",
            "latestFiles": [{"id": 7, "fileDate": "2021-01-01T00:00:00Z"}],
            "latestFilesIndexes": [
                {"gameVersion": "1.14.0", "fileId": 8, "releaseType": 2, "gameVersionTypeId": 67408}
            ]
        }));

        assert_eq!(addon.versions.len(), 1);
        assert_eq!(addon.versions[0].flavor, GameVersion::ClassicEra);
        assert_eq!(addon.versions[0].date, "");
    }

    #[test]
    fn test_unclassifiable_mod_is_still_emitted() {
        let addon = decode_mod(json!({
            "id": 2,
            "name": "Mystery",
            "latestFiles": [{"id": 11, "fileDate": "2021-01-01T00:00:00Z"}],
            "latestFilesIndexes": [
                {"gameVersion": "?", "fileId": 11, "releaseType": 1, "gameVersionTypeId": 424242}
            ]
        }));

        assert_eq!(addon.name, "Mystery");
        assert!(addon.versions.is_empty());
    }

    #[test]
    fn test_search_url() {
        let config = CurseConfig {
            base_url: "https://api.example.com/".to_string(),
            api_key: "key".to_string(),
            ..CurseConfig::default()
        };
        let provider = CurseProvider::new(&config, &HttpClientConfig::default()).unwrap();
        assert_eq!(
            provider.search_url(100).unwrap(),
            "https://api.example.com/v1/mods/search?gameId=1&pageSize=50&index=100"
        );
    }

    #[test]
    fn test_api_key_header_is_attached() {
        let config = CurseConfig {
            api_key: "secret".to_string(),
            ..CurseConfig::default()
        };
        let provider = CurseProvider::new(&config, &HttpClientConfig::default()).unwrap();
        let value = provider.headers.get(API_KEY_HEADER).unwrap();
        assert_eq!(value.to_str().unwrap(), "secret");
        assert!(value.is_sensitive());
    }
}
