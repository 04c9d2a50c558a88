//! Filter source module
//!
//! Derives the current [`Filters`](crate::types::Filters) from navigation
//! state (a route such as `/products/12?merchantIds=1,2`) and notifies
//! subscribers whenever the derived value changes.

mod route;
mod source;

pub use route::parse_route;
pub use source::FilterSource;
