//! # LuxeLane Catalog
//!
//! Client for the product catalog REST API and the domain types it returns.
//!
//! The storefront reducer only sees the [`CatalogClient`] trait. Two
//! implementations are provided:
//!
//! - [`HttpCatalogClient`]: talks to the catalog over HTTP with reqwest
//! - [`MockCatalogClient`]: scripted in-memory catalog for tests
//!
//! ## Example
//!
//! ```no_run
//! use luxelane_catalog::{CatalogClient, CatalogConfig, HttpCatalogClient, ProductQuery, SortOrder};
//!
//! # async fn example() -> Result<(), luxelane_catalog::CatalogError> {
//! let client = HttpCatalogClient::new(&CatalogConfig::default());
//! let query = ProductQuery {
//!     title: "shirt".to_string(),
//!     sort: Some(SortOrder::Asc),
//!     ..ProductQuery::default()
//! };
//!
//! for product in client.fetch_all_products(query).await? {
//!     println!("{} {}", product.title, product.price);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod types;

pub use client::{CatalogClient, CatalogFuture};
pub use config::{CatalogConfig, DEFAULT_BASE_URL};
pub use error::CatalogError;
pub use http::HttpCatalogClient;
pub use mock::MockCatalogClient;
pub use types::{Category, Money, ParseSortOrderError, Product, ProductQuery, SortOrder};
