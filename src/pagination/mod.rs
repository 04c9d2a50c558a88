//! Pagination module
//!
//! The incremental-loading state machine: an append-only list of items that
//! grows one page at a time, with a single-flight guard, a sticky
//! end-of-list flag and a reset that starts over from the first page.
//!
//! # Overview
//!
//! ```text
//! filters change ──► reset() ──► fetch_page(1)
//!                                     │
//! continuation signal ──► load_next() ─┴──► fetch_page(n + 1) ──► state
//! ```
//!
//! Every outcome is reported as a [`FetchOutcome`]; fetch errors never
//! escape the controller.

mod controller;
mod state;

pub use controller::PaginationController;
pub use state::{FetchOutcome, PaginationState};
