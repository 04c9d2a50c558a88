//! Pagination state and fetch outcomes
//!
//! Defines the accumulator observed by the presentation layer and the
//! transitions the controller applies to it.

use crate::types::{Item, PageResponse, FIRST_PAGE};

/// Result of one `fetch_page` / `load_next` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page arrived with at least one item
    Loaded {
        /// Items appended by this page
        count: usize,
        /// Whether this page ended the list
        reached_end: bool,
    },
    /// The page arrived with no items; the list has ended
    Empty,
    /// Transport or decode failure; `error` is set on the state
    Failed {
        /// A later retry of the same page may succeed
        transient: bool,
    },
    /// Precondition not met (already loading, already at the end, or an
    /// invalid page number). Nothing happened.
    Skipped,
    /// The request was aborted, or a reset made its response stale.
    /// Nothing was applied and no error was recorded.
    Discarded,
}

impl FetchOutcome {
    /// True for `Loaded` and `Empty`
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Empty)
    }

    /// True for `Failed`
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// True for outcomes that changed nothing
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Skipped | Self::Discarded)
    }
}

/// Accumulated items plus progression metadata.
///
/// `items` only grows between resets. `current_page` is the last page
/// applied, 0 before the first one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationState {
    /// Loaded items in page order
    pub items: Vec<Item>,
    /// Last successfully applied page
    pub current_page: u32,
    /// A fetch is in flight
    pub loading: bool,
    /// No further pages will be requested until a reset
    pub reached_end: bool,
    /// Total item count reported by the backend, if any
    pub total_items: Option<u64>,
    /// Message of the last failure, cleared when the next fetch starts
    pub error: Option<String>,
    /// Bumped on every reset; responses tagged with an older value are stale
    pub(crate) generation: u64,
}

impl PaginationState {
    /// Create a fresh state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `load_next` would issue a request right now
    pub fn can_advance(&self) -> bool {
        !self.loading && !self.reached_end
    }

    /// Next page `load_next` would request
    pub fn next_page(&self) -> u32 {
        self.current_page + 1
    }

    /// Return to the pristine state and invalidate anything in flight
    pub(crate) fn reset(&mut self) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Check the single-flight and end-of-list preconditions and, if they
    /// hold, mark a fetch as started. Returns the generation to tag it with.
    pub(crate) fn begin_fetch(&mut self) -> Option<u64> {
        if !self.can_advance() {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(self.generation)
    }

    /// Append a page and re-evaluate the end-of-list condition.
    ///
    /// The list ends when the page is short, when the known total has been
    /// loaded, or when the first page is empty.
    pub(crate) fn apply_page(
        &mut self,
        page: u32,
        response: PageResponse,
        page_size: u32,
    ) -> FetchOutcome {
        let count = response.items.len();

        if let Some(total) = response.total_items {
            self.total_items = Some(total);
        }
        self.items.extend(response.items);
        self.current_page = page;
        self.loading = false;

        let short_page = count < page_size as usize;
        let total_reached = self
            .total_items
            .is_some_and(|total| self.items.len() as u64 >= total);
        let empty_first = page == FIRST_PAGE && count == 0;
        if short_page || total_reached || empty_first {
            self.reached_end = true;
        }

        if count == 0 {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Loaded {
                count,
                reached_end: self.reached_end,
            }
        }
    }

    /// Replace the contents with a first page obtained elsewhere
    pub(crate) fn seed(&mut self, response: PageResponse, page_size: u32) -> FetchOutcome {
        self.reset();
        self.apply_page(FIRST_PAGE, response, page_size)
    }

    /// Record a failed fetch; loaded items stay untouched
    pub(crate) fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}
