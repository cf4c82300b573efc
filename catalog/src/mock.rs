//! In-memory catalog for tests and offline runs

use crate::{
    client::{CatalogClient, CatalogFuture},
    error::CatalogError,
    types::{Category, Product, ProductQuery},
};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

type ProductsResult = Result<Vec<Product>, CatalogError>;

/// Scriptable catalog client
///
/// Returns its configured products and categories unless a scripted response
/// is queued. Every request is recorded for later inspection.
///
/// # Example
///
/// ```
/// use luxelane_catalog::{CatalogClient, CatalogError, MockCatalogClient, ProductQuery};
///
/// # tokio_test::block_on(async {
/// let catalog = MockCatalogClient::new();
/// catalog.push_products_response(Err(CatalogError::RequestFailed("offline".into())));
///
/// assert!(catalog.fetch_all_products(ProductQuery::unfiltered()).await.is_err());
/// assert!(catalog.fetch_all_products(ProductQuery::unfiltered()).await.is_ok());
/// assert_eq!(catalog.product_queries().len(), 2);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MockCatalogClient {
    products: Vec<Product>,
    categories: Vec<Category>,
    delay: Option<Duration>,
    scripted: Mutex<VecDeque<(Option<Duration>, ProductsResult)>>,
    product_queries: Mutex<Vec<ProductQuery>>,
    category_requests: Mutex<Vec<Option<u64>>>,
}

impl MockCatalogClient {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Products returned when nothing is scripted
    #[must_use]
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    /// Categories returned by `fetch_category_list`
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Latency applied to every request
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue the result of the next unanswered product request
    pub fn push_products_response(&self, response: ProductsResult) {
        lock(&self.scripted).push_back((None, response));
    }

    /// Queue a product response that takes `delay` to arrive
    pub fn push_delayed_products_response(&self, delay: Duration, response: ProductsResult) {
        lock(&self.scripted).push_back((Some(delay), response));
    }

    /// Every product query received, oldest first
    #[must_use]
    pub fn product_queries(&self) -> Vec<ProductQuery> {
        lock(&self.product_queries).clone()
    }

    /// Every category request received, oldest first
    #[must_use]
    pub fn category_requests(&self) -> Vec<Option<u64>> {
        lock(&self.category_requests).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CatalogClient for MockCatalogClient {
    fn fetch_all_products(&self, query: ProductQuery) -> CatalogFuture<'_, Vec<Product>> {
        lock(&self.product_queries).push(query);
        let (delay, response) = match lock(&self.scripted).pop_front() {
            Some((delay, response)) => (delay.or(self.delay), response),
            None => (self.delay, Ok(self.products.clone())),
        };

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }

    fn fetch_category_list(&self, category_id: Option<u64>) -> CatalogFuture<'_, Vec<Category>> {
        lock(&self.category_requests).push(category_id);
        let response = match category_id {
            None => Ok(self.categories.clone()),
            Some(id) => self
                .categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| vec![c.clone()])
                .ok_or_else(|| CatalogError::NotFound(format!("category {id}"))),
        };

        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }
}
