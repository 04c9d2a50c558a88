//! Server-primed continuation
//!
//! The first page is requested before the consumer is interactive (for
//! example while pre-rendering). Its result seeds the controller; every
//! later page goes through the callback contract.

use super::callback::{CallbackTrigger, LoadStatus};
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::pagination::PaginationController;
use crate::types::{Filters, PageRequest, PageResponse};
use std::sync::Arc;
use tracing::debug;

/// Request the first page without touching any controller
pub async fn prefetch_first_page<P>(fetcher: &P, filters: Filters, page_size: u32) -> Result<PageResponse>
where
    P: PageFetcher + ?Sized,
{
    fetcher
        .fetch(&PageRequest::first(filters, page_size))
        .await
}

/// A controller seeded from a prefetched first page
pub struct PrimedFeed<F> {
    callback: CallbackTrigger<F>,
}

impl<F: PageFetcher> PrimedFeed<F> {
    /// Seed `controller` with the prefetch result.
    ///
    /// On success the items replace whatever the controller held. On
    /// failure the error is recorded and the next `on_load` asks for the
    /// first page again; a cancelled prefetch leaves the controller fresh.
    pub fn hydrate(controller: Arc<PaginationController<F>>, first_page: Result<PageResponse>) -> Self {
        match first_page {
            Ok(response) => {
                controller.prime(response);
            }
            Err(e) if e.is_cancelled() => {
                debug!("Prefetch was cancelled; starting from an empty list");
                controller.reset();
            }
            Err(e) => controller.prime_failed(&e),
        }
        Self {
            callback: CallbackTrigger::new(controller),
        }
    }

    pub fn controller(&self) -> &Arc<PaginationController<F>> {
        self.callback.controller()
    }

    /// Continue with the next page
    pub async fn load(&self) -> LoadStatus {
        self.callback.load().await
    }

    /// Callback form of [`load`](Self::load)
    pub async fn on_load<D>(&self, done: D)
    where
        D: FnOnce(LoadStatus),
    {
        self.callback.on_load(done).await;
    }
}
