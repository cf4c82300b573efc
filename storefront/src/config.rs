//! Storefront configuration
//!
//! Defaults target the public catalog with a 500 ms search debounce. Both can
//! be overridden from the environment:
//!
//! - `LUXELANE_API_URL`: catalog API root
//! - `LUXELANE_SEARCH_DEBOUNCE_MS`: search quiet period in milliseconds

use luxelane_catalog::CatalogConfig;
use std::time::Duration;
use thiserror::Error;

/// Quiet period before typed search text reaches the catalog
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Environment variable overriding the catalog root
pub const API_URL_VAR: &str = "LUXELANE_API_URL";

/// Environment variable overriding the search debounce
pub const SEARCH_DEBOUNCE_VAR: &str = "LUXELANE_SEARCH_DEBOUNCE_MS";

/// Configuration error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something unparseable
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Catalog client settings
    pub catalog: CatalogConfig,
    /// Search debounce quiet period
    pub search_debounce: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl StorefrontConfig {
    /// Point at a different catalog
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.catalog = CatalogConfig::new(base_url);
        self
    }

    /// Change the search debounce
    #[must_use]
    pub const fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through a variable lookup function
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(API_URL_VAR) {
            config = config.with_base_url(url);
        }

        if let Some(raw) = lookup(SEARCH_DEBOUNCE_VAR) {
            let millis = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: SEARCH_DEBOUNCE_VAR,
                value: raw.clone(),
                reason: "expected a whole number of milliseconds",
            })?;
            config = config.with_search_debounce(Duration::from_millis(millis));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the catalog URL is not an
    /// http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.catalog.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "catalog base URL must start with http:// or https://, got {url:?}"
            )));
        }
        Ok(())
    }
}
