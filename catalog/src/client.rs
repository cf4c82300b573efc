//! The catalog client abstraction consumed by the storefront reducer

use crate::{
    error::CatalogError,
    types::{Category, Product, ProductQuery},
};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`CatalogClient`] methods
pub type CatalogFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CatalogError>> + Send + 'a>>;

/// Read access to the product catalog
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the client can
/// be held as `Arc<dyn CatalogClient>` in the reducer environment and moved
/// into effects.
pub trait CatalogClient: Send + Sync {
    /// List products matching `query`
    ///
    /// An empty list is a valid result.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure, a non-success status, or
    /// an unparseable body.
    fn fetch_all_products(&self, query: ProductQuery) -> CatalogFuture<'_, Vec<Product>>;

    /// List categories
    ///
    /// `None` lists every category. `Some(id)` fetches that single category
    /// and returns it as a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, otherwise as for
    /// [`CatalogClient::fetch_all_products`].
    fn fetch_category_list(&self, category_id: Option<u64>) -> CatalogFuture<'_, Vec<Category>>;
}
