//! Page fetcher module
//!
//! A [`PageFetcher`] performs exactly one request for one page. The
//! pagination controller only ever talks to this trait, so tests and
//! pre-rendering hosts can swap in their own source of pages.
//!
//! # Wire contract
//!
//! ```text
//! POST {base}/products[/{categoryId}]?size={page_size}&page={page}
//! body: {"merchantIds":[1,2,3]}
//! resp: {"data":[Item...],"totalItems":123}
//! ```

mod client;

pub use client::HttpPageFetcher;

use crate::error::Result;
use crate::types::{PageRequest, PageResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Source of catalog pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page.
    ///
    /// Implementations return `Error::Cancelled` for aborted requests so the
    /// caller can tell them apart from genuine failures.
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    async fn fetch(&self, request: &PageRequest) -> Result<PageResponse> {
        (**self).fetch(request).await
    }
}
