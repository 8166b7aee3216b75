pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod sink;

pub use catalog::{classify_flavor, Addon, ClassificationMiss, GameVersion, Source, Version};
pub use client::aggregator::run;
pub use client::{CatalogAggregator, CatalogProvider, FetchContext, ProviderError};
pub use crate::config::{Config, ConfigOverrides};
pub use error::{Error, Result};
pub use sink::{CatalogSink, JsonFileSink};
