pub mod download;
pub mod endpoints;
pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::aggregator::SearchQuery;
use crate::app::Result;
use crate::domain::{MetadataResponse, SearchResponse};

pub use endpoints::{Endpoints, DEFAULT_BASE_URL};

/// Network boundary to the archive service.
#[async_trait]
pub trait ArchiveClient {
    /// Base URL the client talks to, ending in `/`.
    fn base_url(&self) -> &str;

    /// Raw XML of the latest-uploads RSS feed.
    async fn latest_rss(&self) -> Result<String>;

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;

    async fn metadata(&self, identifier: &str) -> Result<MetadataResponse>;
}
