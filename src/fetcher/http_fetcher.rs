use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;

use crate::aggregator::SearchQuery;
use crate::app::Result;
use crate::config::ArchiveSettings;
use crate::domain::{MetadataResponse, SearchResponse};
use crate::fetcher::{ArchiveClient, Endpoints};

pub struct HttpArchiveClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpArchiveClient {
    pub fn new(settings: &ArchiveSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("archivist/", env!("CARGO_PKG_VERSION")));

        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoints: Endpoints::new(&settings.base_url)?,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

#[async_trait]
impl ArchiveClient for HttpArchiveClient {
    fn base_url(&self) -> &str {
        self.endpoints.base()
    }

    async fn latest_rss(&self) -> Result<String> {
        let url = self.endpoints.latest_rss()?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/xml"))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        tracing::debug!("Raw XML length: {}", body.len());
        Ok(body)
    }

    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = self.endpoints.search(query)?;
        tracing::debug!("Search: {} (page {})", query.query, query.page);

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<SearchResponse>().await?)
    }

    async fn metadata(&self, identifier: &str) -> Result<MetadataResponse> {
        let url = self.endpoints.metadata(identifier)?;
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.json::<MetadataResponse>().await?)
    }
}
