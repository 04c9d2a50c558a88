//! HTTP client module
//!
//! Thin wrapper over reqwest that the page fetcher talks through.
//!
//! # Features
//!
//! - **Base URL joining**: relative paths resolve against the API base
//! - **Default headers**: applied to every request
//! - **Status classification**: non-2xx responses become `Error::HttpStatus`
//!
//! Every request is attempted exactly once; nothing here retries.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
