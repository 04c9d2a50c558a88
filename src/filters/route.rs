//! Route to filter translation

use crate::error::{Error, Result};
use crate::types::Filters;
use tracing::debug;
use url::Url;

/// Query key carrying merchant ids
pub const MERCHANT_IDS_KEY: &str = "merchantIds";

/// Derive filters from a route.
///
/// - `merchantIds` may be comma-joined (`?merchantIds=1,2`), repeated
///   (`?merchantIds=1&merchantIds=2`) or both. Entries that are not
///   integers are ignored.
/// - A numeric last path segment is the category (`/products/12`).
///
/// Relative routes resolve against a placeholder origin; absolute URLs are
/// accepted as-is.
pub fn parse_route(route: &str) -> Result<Filters> {
    let url = Url::parse(route).or_else(|_| {
        Url::parse("http://localhost/")
            .and_then(|base| base.join(route))
            .map_err(|e| Error::invalid_route(route, e.to_string()))
    })?;

    let mut filters = Filters::new();

    for (key, value) in url.query_pairs() {
        if key != MERCHANT_IDS_KEY && key != "merchantIds[]" {
            continue;
        }
        for raw in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<u64>() {
                Ok(id) => {
                    filters.merchant_ids.insert(id);
                }
                Err(_) => debug!("Ignoring non-numeric merchant id {:?}", raw),
            }
        }
    }

    filters.category_id = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .and_then(|segment| segment.parse().ok());

    Ok(filters)
}
