pub mod http_fetcher;
pub mod static_fetcher;

use async_trait::async_trait;
use url::Url;

use crate::app::{Result, RoostError};

pub use http_fetcher::HttpFetcher;
pub use static_fetcher::StaticFetcher;

/// Fetch-by-URL primitive. Implementations return the raw page body.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Timeline page URL for a handle: `{base_url}/{handle}`.
///
/// The handle is always a single path segment, so it can never change the
/// host or add a query.
pub fn timeline_url(base_url: &str, handle: &str) -> Result<String> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| RoostError::Config(format!("base URL {} cannot take a path", base_url)))?
        .pop_if_empty()
        .push(handle);
    Ok(url.to_string())
}
