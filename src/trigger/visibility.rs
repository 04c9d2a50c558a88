//! Visibility-driven continuation
//!
//! Loads the next page when a sentinel placed after the last item comes
//! within `root_margin` of the viewport, and keeps loading while the
//! content is too short to scroll (a sentinel that can never scroll into
//! view would otherwise stall the list).

use crate::config::ViewportConfig;
use crate::fetcher::PageFetcher;
use crate::pagination::{FetchOutcome, PaginationController};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Size of the scrolled content against the visible area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ViewportMetrics {
    /// Content overflows the viewport by more than `slack`
    pub fn is_scrollable(&self, slack: f64) -> bool {
        self.content_height > self.viewport_height + slack
    }
}

/// Where the sentinel sits relative to the current scroll position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentinelEntry {
    /// Offset of the sentinel from the top of the content
    pub sentinel_offset: f64,
    /// Current scroll offset
    pub scroll_offset: f64,
    pub viewport_height: f64,
}

impl SentinelEntry {
    /// Within the viewport grown by `root_margin` on both edges
    pub fn is_visible(&self, root_margin: f64) -> bool {
        let top = self.scroll_offset - root_margin;
        let bottom = self.scroll_offset + self.viewport_height + root_margin;
        (top..=bottom).contains(&self.sentinel_offset)
    }
}

/// Layout source queried after every change to the item list
pub trait Viewport: Send + Sync {
    fn metrics(&self) -> ViewportMetrics;
}

impl<T> Viewport for T
where
    T: Fn() -> ViewportMetrics + Send + Sync,
{
    fn metrics(&self) -> ViewportMetrics {
        self()
    }
}

/// Something the consumer observed that may warrant another page
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContinuationSignal {
    /// The sentinel moved; load if it is now visible
    Sentinel(SentinelEntry),
    /// Platform-neutral "ready for more"
    Ready,
}

/// Drives a controller from viewport events
pub struct VisibilityTrigger<F> {
    controller: Arc<PaginationController<F>>,
    config: ViewportConfig,
}

impl<F: PageFetcher> VisibilityTrigger<F> {
    pub fn new(controller: Arc<PaginationController<F>>, config: ViewportConfig) -> Self {
        Self { controller, config }
    }

    /// Handle one signal. `None` means no fetch was attempted.
    pub async fn on_signal(&self, signal: ContinuationSignal) -> Option<FetchOutcome> {
        if let ContinuationSignal::Sentinel(entry) = signal {
            if !entry.is_visible(self.config.root_margin) {
                return None;
            }
        }
        self.advance().await
    }

    /// Load another page if the content does not yet fill the viewport
    pub async fn ensure_filled(&self, viewport: &dyn Viewport) -> Option<FetchOutcome> {
        let metrics = viewport.metrics();
        if metrics.is_scrollable(self.config.scroll_slack) {
            return None;
        }
        debug!(
            "Content ({}) does not fill viewport ({}); backfilling",
            metrics.content_height, metrics.viewport_height
        );
        self.advance().await
    }

    /// Process signals until the sending side is dropped.
    ///
    /// Checks the viewport once on entry (mount) and again whenever the
    /// number of loaded items changes.
    pub async fn run<V: Viewport>(&self, mut signals: mpsc::Receiver<ContinuationSignal>, viewport: V) {
        let mut state = self.controller.subscribe();
        let mut seen_items = None;

        loop {
            let items = state.borrow_and_update().items.len();
            if seen_items != Some(items) {
                seen_items = Some(items);
                self.ensure_filled(&viewport).await;
            }

            tokio::select! {
                signal = signals.recv() => match signal {
                    Some(signal) => {
                        self.on_signal(signal).await;
                    }
                    None => break,
                },
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        debug!("Continuation signals closed; visibility trigger stopped");
    }

    async fn advance(&self) -> Option<FetchOutcome> {
        if !self.controller.state().can_advance() {
            return None;
        }
        Some(self.controller.load_next().await)
    }
}
