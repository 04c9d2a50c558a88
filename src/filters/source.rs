//! Change-notifying holder of the current filters

use super::route::parse_route;
use crate::error::Result;
use crate::types::Filters;
use tokio::sync::watch;
use tracing::info;

/// Exposes the current filters and publishes every change.
///
/// Setting a value equal to the current one is not a change and wakes
/// nobody.
#[derive(Debug)]
pub struct FilterSource {
    current: watch::Sender<Filters>,
}

impl FilterSource {
    /// Create a source holding `initial`
    pub fn new(initial: Filters) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    /// Create a source from a route
    pub fn from_route(route: &str) -> Result<Self> {
        Ok(Self::new(parse_route(route)?))
    }

    /// Current filters
    pub fn current(&self) -> Filters {
        self.current.borrow().clone()
    }

    /// Receiver observing every future change
    pub fn subscribe(&self) -> watch::Receiver<Filters> {
        self.current.subscribe()
    }

    /// Replace the filters. Returns whether the value changed.
    pub fn set(&self, filters: Filters) -> bool {
        self.current.send_if_modified(|current| {
            if *current == filters {
                return false;
            }
            info!(
                "Filters changed: merchants {:?} -> {:?}, category {:?} -> {:?}",
                current.merchant_ids, filters.merchant_ids, current.category_id, filters.category_id
            );
            *current = filters;
            true
        })
    }

    /// Re-derive the filters from a new route. Returns whether they changed.
    pub fn navigate(&self, route: &str) -> Result<bool> {
        Ok(self.set(parse_route(route)?))
    }
}

impl Default for FilterSource {
    fn default() -> Self {
        Self::new(Filters::default())
    }
}
