//! Catalog client configuration

/// Public catalog the storefront talks to by default
pub const DEFAULT_BASE_URL: &str = "https://api.escuelajs.co/api/v1";

/// Configuration for [`HttpCatalogClient`](crate::HttpCatalogClient)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root, without trailing slash
    pub base_url: String,
}

impl CatalogConfig {
    /// Configuration pointing at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
