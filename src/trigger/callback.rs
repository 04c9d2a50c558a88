//! Callback-driven continuation

use crate::fetcher::PageFetcher;
use crate::pagination::{FetchOutcome, PaginationController};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Status handed to the consumer's `done` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    /// More may follow
    Ok,
    /// The list has ended (or this load added nothing)
    Empty,
    /// The load failed; calling again retries
    Error,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers a widget's `on_load(done)` requests
pub struct CallbackTrigger<F> {
    controller: Arc<PaginationController<F>>,
}

impl<F> Clone for CallbackTrigger<F> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<F: PageFetcher> CallbackTrigger<F> {
    pub fn new(controller: Arc<PaginationController<F>>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &Arc<PaginationController<F>> {
        &self.controller
    }

    /// Load the next page and report how it went.
    ///
    /// While a fetch is already in flight, or once the list has ended, this
    /// answers immediately without fetching.
    pub async fn load(&self) -> LoadStatus {
        let outcome = self.controller.load_next().await;
        let status = match outcome {
            FetchOutcome::Failed { .. } => LoadStatus::Error,
            FetchOutcome::Empty | FetchOutcome::Loaded {
                reached_end: true, ..
            } => LoadStatus::Empty,
            FetchOutcome::Loaded { .. } => LoadStatus::Ok,
            FetchOutcome::Skipped | FetchOutcome::Discarded => {
                if self.controller.state().reached_end {
                    LoadStatus::Empty
                } else {
                    LoadStatus::Ok
                }
            }
        };
        debug!("on_load resolved with {status} ({outcome:?})");
        status
    }

    /// Callback form of [`load`](Self::load): `done` is called exactly once
    pub async fn on_load<D>(&self, done: D)
    where
        D: FnOnce(LoadStatus),
    {
        done(self.load().await);
    }
}
