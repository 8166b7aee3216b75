use crate::client::providers::ProviderError;
use thiserror::Error;

/// Top-level error for a catalog run
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (raised before any network activity)
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // Provider errors (fatal for the whole run)
    #[error("Provider {provider} failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Fetch task failed: {0}")]
    Task(String),

    // Sink errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error was raised while loading or validating configuration
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidConfig { .. })
    }

    /// Name of the provider that failed, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Provider { provider, .. } => Some(provider),
            _ => None,
        }
    }

    pub(crate) fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
