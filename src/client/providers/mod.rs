pub mod curse;
pub mod traits;
pub mod tukui;

pub use curse::CurseProvider;
pub use traits::{CatalogProvider, FetchContext, ProviderError};
pub use tukui::{TukuiEndpoint, TukuiProvider};
