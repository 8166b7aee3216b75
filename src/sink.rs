use crate::catalog::Addon;
use crate::config::OutputConfig;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for the finished catalog
#[async_trait]
pub trait CatalogSink: Send + Sync {
    async fn write(&self, addons: &[Addon]) -> Result<()>;
}

/// Writes the catalog as a single JSON array
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            path: path.into(),
            pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl From<&OutputConfig> for JsonFileSink {
    fn from(config: &OutputConfig) -> Self {
        Self::new(config.path.clone(), config.pretty)
    }
}

#[async_trait]
impl CatalogSink for JsonFileSink {
    async fn write(&self, addons: &[Addon]) -> Result<()> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(addons)?
        } else {
            serde_json::to_vec(addons)?
        };

        tokio::fs::write(&self.path, &bytes).await?;
        info!(
            "Wrote {} addons ({} bytes) to {}",
            addons.len(),
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}
