//! Configuration for a product feed instance
//!
//! Loaded from YAML, optionally overridden from the environment, and
//! validated before anything is constructed from it.

use crate::error::{Error, Result, ResultExt};
use crate::presentation::NumberLocale;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api_base`
pub const ENV_API_BASE: &str = "PRODUCT_FEED_API_BASE";

/// Environment variable overriding `page_size`
pub const ENV_PAGE_SIZE: &str = "PRODUCT_FEED_PAGE_SIZE";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete feed configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the catalog API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Items per page, fixed for the lifetime of a loader
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Number formatting convention for display prices
    #[serde(default)]
    pub locale: LocaleName,

    /// Geometry used by the visibility trigger
    #[serde(default)]
    pub viewport: ViewportConfig,
}

fn default_api_base() -> String {
    "https://interview-api.azkivam.com/api/v1".to_string()
}

fn default_page_size() -> u32 {
    20
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            http: HttpConfig::default(),
            locale: LocaleName::default(),
            viewport: ViewportConfig::default(),
        }
    }
}

impl FeedConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: FeedConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PRODUCT_FEED_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size
                .trim()
                .parse()
                .map_err(|e| Error::invalid_value("page_size", format!("{size:?}: {e}")))?;
        }
        self.validate()
    }

    /// Check invariants that the loader relies on
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than 0"));
        }
        let base = url::Url::parse(&self.api_base)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_base",
                format!("unsupported scheme '{}'", base.scheme()),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }

    /// Number locale selected by `locale`
    pub fn number_locale(&self) -> NumberLocale {
        match self.locale {
            LocaleName::Persian => NumberLocale::persian(),
            LocaleName::Latin => NumberLocale::latin(),
        }
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("product-feed/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Locale / Viewport
// ============================================================================

/// Named number formatting convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleName {
    /// fa-IR: Persian digits, `٬` grouping
    #[default]
    Persian,
    /// Western digits, `,` grouping
    Latin,
}

/// Viewport geometry for the visibility trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// How far outside the viewport the sentinel still counts as visible
    #[serde(default = "default_root_margin")]
    pub root_margin: f64,

    /// Content must exceed the viewport by this much to count as scrollable
    #[serde(default = "default_scroll_slack")]
    pub scroll_slack: f64,
}

fn default_root_margin() -> f64 {
    400.0
}

fn default_scroll_slack() -> f64 {
    50.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            root_margin: default_root_margin(),
            scroll_slack: default_scroll_slack(),
        }
    }
}
