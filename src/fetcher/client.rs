//! HTTP-backed page fetcher

use super::PageFetcher;
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::{Filters, PageRequest, PageResponse};
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

/// Fetches pages from the catalog API
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: HttpClient,
    /// Bumped by `abort_all`; in-flight requests watch it
    abort_epoch: watch::Sender<u64>,
}

impl HttpPageFetcher {
    /// Create a fetcher over an existing client
    pub fn new(client: HttpClient) -> Self {
        let (abort_epoch, _) = watch::channel(0);
        Self {
            client,
            abort_epoch,
        }
    }

    /// Create a fetcher from feed configuration
    pub fn from_config(config: &FeedConfig) -> Result<Self> {
        let client =
            HttpClient::with_config(HttpClientConfig::from_feed(&config.api_base, &config.http))?;
        Ok(Self::new(client))
    }

    /// Request path for the given filters, relative to the API base
    pub fn endpoint(filters: &Filters) -> String {
        match filters.category_id {
            Some(category) => format!("products/{category}"),
            None => "products".to_string(),
        }
    }

    /// Make every in-flight request resolve as `Error::Cancelled`.
    ///
    /// Requests started afterwards are unaffected.
    pub fn abort_all(&self) {
        self.abort_epoch.send_modify(|epoch| *epoch += 1);
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        let mut aborted = self.abort_epoch.subscribe();

        let path = Self::endpoint(&request.filters);
        let config = RequestConfig::new()
            .query("size", request.page_size)
            .query("page", request.page)
            .json(serde_json::to_value(&request.filters)?);

        debug!(
            "Fetching page {} (size {}) from {}",
            request.page, request.page_size, path
        );

        tokio::select! {
            result = self.client.post_json::<PageResponse>(&path, config) => result,
            _ = aborted.changed() => {
                debug!("Page {} request aborted", request.page);
                Err(Error::Cancelled)
            }
        }
    }
}
