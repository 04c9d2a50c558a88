//! Trigger module
//!
//! Adapters that turn a consumer's "I want more" signal into `load_next`
//! calls. All of them share one contract: advance only when nothing is in
//! flight and the list has not ended.
//!
//! - [`VisibilityTrigger`] - sentinel visibility plus empty-viewport backfill
//! - [`CallbackTrigger`] - `on_load(done)` resolved with `"ok" | "empty" | "error"`
//! - [`PrimedFeed`] - first page fetched ahead of time, continued by callback

mod callback;
mod primed;
mod visibility;

pub use callback::{CallbackTrigger, LoadStatus};
pub use primed::{prefetch_first_page, PrimedFeed};
pub use visibility::{ContinuationSignal, SentinelEntry, Viewport, ViewportMetrics, VisibilityTrigger};

#[cfg(test)]
mod tests;
