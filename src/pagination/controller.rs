//! Pagination controller
//!
//! Owns the [`PaginationState`] and drives it through the fetcher. State is
//! published through a `tokio::sync::watch` channel: every real mutation
//! notifies subscribers, no-ops notify nobody.

use super::state::{FetchOutcome, PaginationState};
use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::types::{Filters, PageRequest, PageResponse, FIRST_PAGE};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Loads pages on demand into an append-only list.
///
/// At most one fetch is in flight at a time. The check and the claim of the
/// `loading` flag happen under one lock acquisition, with no suspension in
/// between, so concurrent callers see either the claim or a `Skipped`.
pub struct PaginationController<F> {
    fetcher: F,
    filters: watch::Receiver<Filters>,
    state: watch::Sender<PaginationState>,
    page_size: u32,
}

impl<F: PageFetcher> PaginationController<F> {
    /// Create a controller reading its filters from `filters`
    pub fn new(fetcher: F, filters: watch::Receiver<Filters>, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        let (state, _) = watch::channel(PaginationState::new());
        Ok(Self {
            fetcher,
            filters,
            state,
            page_size,
        })
    }

    /// Items requested per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Filters the next request will carry
    pub fn filters(&self) -> Filters {
        self.filters.borrow().clone()
    }

    /// Borrow the current state.
    ///
    /// Do not hold the guard across an `.await`; it blocks every mutation.
    pub fn state(&self) -> watch::Ref<'_, PaginationState> {
        self.state.borrow()
    }

    /// Clone the current state
    pub fn snapshot(&self) -> PaginationState {
        self.state.borrow().clone()
    }

    /// Observe every future state mutation
    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.state.subscribe()
    }

    /// Clear items, total, error and end-of-list and return to before the
    /// first page. Any in-flight response becomes stale. Does not fetch.
    pub fn reset(&self) {
        self.state.send_modify(PaginationState::reset);
        debug!("Pagination reset");
    }

    /// Fetch `page` and append it.
    ///
    /// Skipped without side effects while another fetch is in flight or after
    /// the list has ended. `loading` is cleared however the fetch finishes,
    /// including when this future is dropped before completion.
    pub async fn fetch_page(&self, page: u32) -> FetchOutcome {
        if page < FIRST_PAGE {
            warn!("Refusing to fetch page {page}; pages start at {FIRST_PAGE}");
            return FetchOutcome::Skipped;
        }

        let mut claimed = None;
        self.state.send_if_modified(|state| {
            claimed = state.begin_fetch();
            claimed.is_some()
        });
        let Some(generation) = claimed else {
            debug!("Skipping page {page}: already loading or at end of list");
            return FetchOutcome::Skipped;
        };

        let mut in_flight = InFlight {
            state: &self.state,
            generation,
            settled: false,
        };

        let request = PageRequest::new(self.filters(), page, self.page_size);
        let result = self.fetcher.fetch(&request).await;

        in_flight.settled = true;
        self.settle(generation, page, result)
    }

    /// Fetch the page after `current_page`
    pub async fn load_next(&self) -> FetchOutcome {
        let page = self.state.borrow().next_page();
        self.fetch_page(page).await
    }

    /// Reset and fetch the first page
    pub async fn reload(&self) -> FetchOutcome {
        self.reset();
        self.fetch_page(FIRST_PAGE).await
    }

    /// Seed the list with a first page fetched elsewhere (e.g. before the
    /// consumer became interactive). Replaces any current contents.
    pub fn prime(&self, response: PageResponse) -> FetchOutcome {
        let mut outcome = FetchOutcome::Discarded;
        let page_size = self.page_size;
        self.state.send_modify(|state| {
            outcome = state.seed(response, page_size);
            info!(
                "Primed with {} items (reached end: {})",
                state.items.len(),
                state.reached_end
            );
        });
        outcome
    }

    /// Record that the out-of-band first page could not be loaded.
    /// The next `load_next` requests the first page again.
    pub fn prime_failed(&self, error: &Error) {
        let message = error.to_string();
        self.state.send_modify(|state| {
            state.reset();
            state.fail(message);
        });
        warn!("Priming failed: {error}");
    }

    /// Give up on the in-flight fetch: its response will be discarded and a
    /// new fetch may start immediately. Loaded items are kept.
    /// Returns whether anything was in flight.
    pub fn cancel_in_flight(&self) -> bool {
        self.state.send_if_modified(|state| {
            if !state.loading {
                return false;
            }
            state.generation = state.generation.wrapping_add(1);
            state.loading = false;
            true
        })
    }

    /// Reload from the first page on every filter change, until the filter
    /// source goes away.
    ///
    /// A change that arrives while a first-page fetch is still in flight
    /// abandons that fetch, so the most recently requested filters win.
    pub async fn follow_filters(&self) {
        let mut filters = self.filters.clone();
        let mut pending = false;

        loop {
            if !pending && filters.changed().await.is_err() {
                break;
            }
            filters.borrow_and_update();
            pending = false;

            tokio::select! {
                _ = self.reload() => {}
                changed = filters.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    debug!("Filters changed again before the first page arrived");
                    pending = true;
                }
            }
        }

        debug!("Filter source closed; no longer following");
    }

    fn settle(&self, generation: u64, page: u32, result: Result<PageResponse>) -> FetchOutcome {
        let mut outcome = FetchOutcome::Discarded;
        let page_size = self.page_size;

        self.state.send_if_modified(|state| {
            if state.generation != generation {
                debug!("Discarding stale response for page {page}");
                return false;
            }
            match result {
                Ok(response) => {
                    outcome = state.apply_page(page, response, page_size);
                    debug!(
                        "Page {page} applied: {} items loaded{}",
                        state.items.len(),
                        if state.reached_end { ", end of list" } else { "" }
                    );
                }
                Err(e) if e.is_cancelled() => {
                    debug!("Page {page} request cancelled");
                    state.loading = false;
                }
                Err(e) => {
                    let transient = e.is_transient();
                    warn!("Failed to load page {page} (transient: {transient}): {e}");
                    state.fail(e.to_string());
                    outcome = FetchOutcome::Failed { transient };
                }
            }
            true
        });

        outcome
    }
}

impl<F> std::fmt::Debug for PaginationController<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PaginationController")
            .field("page_size", &self.page_size)
            .field("current_page", &state.current_page)
            .field("items", &state.items.len())
            .field("loading", &state.loading)
            .field("reached_end", &state.reached_end)
            .finish_non_exhaustive()
    }
}

/// Clears `loading` if the fetch future is dropped before it settles
struct InFlight<'a> {
    state: &'a watch::Sender<PaginationState>,
    generation: u64,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let generation = self.generation;
        self.state.send_if_modified(|state| {
            if state.generation != generation || !state.loading {
                return false;
            }
            debug!("In-flight fetch dropped");
            state.loading = false;
            true
        });
    }
}
