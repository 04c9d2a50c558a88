//! Common types used throughout the product feed
//!
//! This module contains the catalog record, the request-shaping filters and
//! the page request/response pair exchanged with the backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of the first page. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

// ============================================================================
// Catalog Item
// ============================================================================

/// A product record as returned by the catalog backend.
///
/// Missing fields and display strings sent as `null` decode as their
/// defaults, so one sparse record cannot fail its whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    pub available: bool,
    pub category_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub category_name: String,
    pub min_price: f64,
    pub max_price: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    /// Eligible for Azkivam installment purchase
    pub azkivam: bool,
    pub hidden: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub merchant_name: String,
    pub merchant_id: u64,
}

// ============================================================================
// Filters
// ============================================================================

/// Criteria that shape which items a page request returns.
///
/// Compared by value: two filters with the same merchants (in any order) and
/// the same category are equal. Only `merchantIds` travels in the request
/// body; the category is part of the request path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    /// Selected merchants. Empty means unfiltered.
    #[serde(default)]
    pub merchant_ids: BTreeSet<u64>,
    #[serde(skip)]
    pub category_id: Option<u64>,
}

impl Filters {
    /// Create unfiltered criteria
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given merchants
    #[must_use]
    pub fn with_merchants(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.merchant_ids = ids.into_iter().collect();
        self
    }

    /// Restrict to a category
    #[must_use]
    pub fn with_category(mut self, category_id: u64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// True when no criteria are set
    pub fn is_unfiltered(&self) -> bool {
        self.merchant_ids.is_empty() && self.category_id.is_none()
    }
}

// ============================================================================
// Page Request / Response
// ============================================================================

/// One page request: filters, 1-based page number and page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub filters: Filters,
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Create a page request
    pub fn new(filters: Filters, page: u32, page_size: u32) -> Self {
        Self {
            filters,
            page,
            page_size,
        }
    }

    /// Request for the first page
    pub fn first(filters: Filters, page_size: u32) -> Self {
        Self::new(filters, FIRST_PAGE, page_size)
    }
}

/// One page of results.
///
/// A missing `data` field decodes as an empty page; a missing `totalItems`
/// decodes as `None` and leaves any previously known total in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    #[serde(default, rename = "data", deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    #[serde(default)]
    pub total_items: Option<u64>,
}

impl PageResponse {
    /// Create a page response
    pub fn new(items: Vec<Item>, total_items: Option<u64>) -> Self {
        Self { items, total_items }
    }

    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_compare_by_value() {
        let a = Filters::new().with_merchants([3, 1, 2]);
        let b = Filters::new().with_merchants([1, 2, 3]);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_category(7));
    }

    #[test]
    fn test_filters_body_shape() {
        let filters = Filters::new().with_merchants([2, 1]).with_category(9);
        let body = serde_json::to_value(&filters).unwrap();
        assert_eq!(body, json!({"merchantIds": [1, 2]}));
    }

    #[test]
    fn test_unfiltered() {
        assert!(Filters::new().is_unfiltered());
        assert!(!Filters::new().with_category(1).is_unfiltered());
    }

    #[test]
    fn test_item_decodes_backend_shape() {
        let item: Item = serde_json::from_value(json!({
            "id": "p-1",
            "name": "Kettle",
            "slug": "kettle",
            "available": true,
            "categoryId": 12,
            "categoryName": "Kitchen",
            "minPrice": 1200000,
            "maxPrice": 1500000.5,
            "imageUrl": "https:///img.png",
            "azkivam": true,
            "hidden": false,
            "merchantName": "Shop",
            "merchantId": 5
        }))
        .unwrap();

        assert_eq!(item.category_id, 12);
        assert_eq!(item.merchant_id, 5);
        assert!((item.max_price - 1_500_000.5).abs() < f64::EPSILON);
        assert!(item.azkivam);
    }

    #[test]
    fn test_page_response_missing_fields() {
        let page: PageResponse = serde_json::from_value(json!({})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_items, None);

        let page: PageResponse =
            serde_json::from_value(json!({"data": null, "totalItems": 4})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_items, Some(4));
    }

    #[test]
    fn test_null_display_strings_decode_as_empty() {
        let page: PageResponse = serde_json::from_value(json!({
            "data": [{
                "id": "p-1",
                "name": null,
                "slug": null,
                "categoryName": null,
                "imageUrl": null,
                "merchantName": null,
                "minPrice": 1000
            }],
            "totalItems": 1
        }))
        .unwrap();

        let item = &page.items[0];
        assert_eq!(item.id, "p-1");
        assert_eq!(item.image_url, "");
        assert_eq!(item.name, "");
        assert_eq!(item.merchant_name, "");
        assert_eq!(page.total_items, Some(1));
        assert_eq!(
            crate::presentation::normalize_image_url(&item.image_url),
            ""
        );
    }

    #[test]
    fn test_page_response_rejects_bad_shape() {
        let result: std::result::Result<PageResponse, _> =
            serde_json::from_value(json!({"data": "nope"}));
        assert!(result.is_err());
    }
}
