//! Item to display-item mapping

use super::locale::NumberLocale;
use crate::pagination::PaginationState;
use crate::types::Item;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Leading `https:`, optionally followed by a stray extra colon
static HTTPS_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https::?").unwrap());

/// Leading `http:`, optionally followed by a stray extra colon
static HTTP_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^http::?").unwrap());

/// Coerce the scheme prefix of an image URL to `http:`.
///
/// Two anchored passes: `https:`/`https::` become `http:`, then a doubled
/// `http::` collapses to `http:`. The rest of the URL is untouched and empty
/// input stays empty.
pub fn normalize_image_url(url: &str) -> String {
    let url = HTTPS_PREFIX.replace(url, "http:");
    HTTP_PREFIX.replace(&url, "http:").into_owned()
}

/// An item ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub available: bool,
    pub category_id: u64,
    pub category_name: String,
    pub min_price: String,
    pub max_price: String,
    pub image_url: String,
    pub azkivam: bool,
    pub hidden: bool,
    pub merchant_name: String,
    pub merchant_id: u64,
}

/// Map one item
pub fn present_item(item: &Item, locale: &NumberLocale) -> DisplayItem {
    DisplayItem {
        id: item.id.clone(),
        name: item.name.clone(),
        slug: item.slug.clone(),
        available: item.available,
        category_id: item.category_id,
        category_name: item.category_name.clone(),
        min_price: locale.format(item.min_price),
        max_price: locale.format(item.max_price),
        image_url: normalize_image_url(&item.image_url),
        azkivam: item.azkivam,
        hidden: item.hidden,
        merchant_name: item.merchant_name.clone(),
        merchant_id: item.merchant_id,
    }
}

/// Map a list of items, preserving order
pub fn present(items: &[Item], locale: &NumberLocale) -> Vec<DisplayItem> {
    items.iter().map(|item| present_item(item, locale)).collect()
}

/// What a consumer renders: display items plus loading indicators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView {
    pub items: Vec<DisplayItem>,
    pub loading: bool,
    pub reached_end: bool,
    pub total_items: Option<u64>,
    pub error: Option<String>,
}

impl FeedView {
    /// Derive the view from a state snapshot
    pub fn from_state(state: &PaginationState, locale: &NumberLocale) -> Self {
        Self {
            items: present(&state.items, locale),
            loading: state.loading,
            reached_end: state.reached_end,
            total_items: state.total_items,
            error: state.error.clone(),
        }
    }
}
