//! # Configuration
//!
//! Settings are layered, lowest priority first: compiled defaults, an optional
//! TOML file, `CATALOG__*` environment variables, then command-line overrides.
//! For example `CATALOG__CURSE__API_KEY` sets `curse.api_key`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CATALOG";

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "catalog-0.2.0.json";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub curse: CurseConfig,
    pub tukui: TukuiConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// CurseForge API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurseConfig {
    /// API key sent as `x-api-key`; required
    pub api_key: String,
    /// API root, without the `/v1` path
    pub base_url: String,
    /// Game id to search (1 is World of Warcraft)
    pub game_id: u32,
    /// Mods requested per search page
    pub page_size: usize,
}

impl Default for CurseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.curseforge.com".to_string(),
            game_id: 1,
            page_size: 50,
        }
    }
}

/// Tukui API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TukuiConfig {
    /// Full URL of the `api.php` endpoint
    pub base_url: String,
}

impl Default for TukuiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.tukui.org/api.php".to_string(),
        }
    }
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: format!("addon-catalog/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where the merged catalog is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            pretty: false,
        }
    }
}

/// Command-line overrides applied on top of file and environment settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub output: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub pretty: bool,
}

impl Config {
    /// Load defaults, the optional file at `path`, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.api_key {
            self.curse.api_key = api_key;
        }
        if let Some(output) = overrides.output {
            self.output.path = output;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.http.timeout_secs = timeout_secs;
        }
        if overrides.pretty {
            self.output.pretty = true;
        }
    }

    /// Check the configuration before any network activity
    pub fn validate(&self) -> Result<()> {
        if self.curse.api_key.trim().is_empty() {
            return Err(Error::invalid_config(
                "curse.api_key",
                "a CurseForge API key is required",
            ));
        }

        if self.curse.page_size == 0 {
            return Err(Error::invalid_config("curse.page_size", "must be greater than 0"));
        }

        for (field, value) in [
            ("curse.base_url", &self.curse.base_url),
            ("tukui.base_url", &self.tukui.base_url),
        ] {
            Url::parse(value).map_err(|e| Error::invalid_config(field, e.to_string()))?;
        }

        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_config("http.timeout_secs", "must be greater than 0"));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(Error::invalid_config("output.path", "must not be empty"));
        }

        Ok(())
    }
}
