// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Product Feed
//!
//! Incremental loading of a paginated product catalog into a continuously
//! growing list, driven by scroll visibility, widget callbacks or a
//! server-prefetched first page.
//!
//! ## Features
//!
//! - **Single-flight pagination**: at most one page request in flight, sticky end-of-list
//! - **Filter-driven reset**: merchant and category filters derived from the route
//! - **Three trigger strategies**: sentinel visibility, `on_load(done)` callback, primed first page
//! - **Observable state**: every mutation published on a `tokio::sync::watch` channel
//! - **Display mapping**: image URL normalization and Persian price formatting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use product_feed::config::FeedConfig;
//! use product_feed::fetcher::HttpPageFetcher;
//! use product_feed::filters::FilterSource;
//! use product_feed::pagination::PaginationController;
//!
//! #[tokio::main]
//! async fn main() -> product_feed::Result<()> {
//!     let config = FeedConfig::default();
//!     let source = FilterSource::from_route("/category/12?merchantIds=3,7")?;
//!     let controller = PaginationController::new(
//!         HttpPageFetcher::from_config(&config)?,
//!         source.subscribe(),
//!         config.page_size,
//!     )?;
//!
//!     while controller.state().can_advance() {
//!         controller.load_next().await;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  change   ┌──────────────────────┐  fetch(page)  ┌─────────────┐
//! │ FilterSource │ ────────▶ │ PaginationController │ ────────────▶ │ PageFetcher │
//! └──────────────┘           │   PaginationState    │ ◀──────────── └─────────────┘
//!                            └──────────────────────┘   PageResponse
//!                              ▲                 │ watch
//!               load_next()    │                 ▼
//! ┌────────────────────────────┴──┐     ┌────────────────────┐
//! │ Visibility │ Callback │ Primed │     │ PresentationMapper │
//! └───────────────────────────────┘     └────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the feed
pub mod error;

/// Catalog records and page request/response types
pub mod types;

/// Feed configuration
pub mod config;

/// HTTP client
pub mod http;

/// Page fetching against the catalog API
pub mod fetcher;

/// Filter criteria derived from navigation state
pub mod filters;

/// Pagination state machine
pub mod pagination;

/// Continuation triggers
pub mod trigger;

/// Display mapping
pub mod presentation;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use pagination::{FetchOutcome, PaginationController, PaginationState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
