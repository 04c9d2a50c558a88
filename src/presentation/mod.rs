//! Presentation module
//!
//! Pure, read-only transforms from loaded items to display-ready items:
//! image URL cleanup and locale-grouped prices. Nothing here mutates the
//! pagination state; views are recomputed from it on every read.

mod locale;
mod mapper;

pub use locale::NumberLocale;
pub use mapper::{normalize_image_url, present, present_item, DisplayItem, FeedView};
