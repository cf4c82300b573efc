//! reqwest-backed catalog client

use crate::{
    client::{CatalogClient, CatalogFuture},
    config::CatalogConfig,
    error::CatalogError,
    types::{Category, Product, ProductQuery},
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

/// Catalog client talking to the REST API over HTTP
///
/// No request timeout is configured and failures are never retried: the
/// caller decides when to ask again.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a client for the configured catalog
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing reqwest client
    #[must_use]
    pub fn with_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// API root this client sends requests to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, CatalogError> {
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::RequestFailed(e.to_string()))?;

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Catalog responded");

        match status {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound(resource.to_string())),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| CatalogError::ResponseParseFailed(e.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(CatalogError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}

impl CatalogClient for HttpCatalogClient {
    fn fetch_all_products(&self, query: ProductQuery) -> CatalogFuture<'_, Vec<Product>> {
        Box::pin(async move {
            let url = format!("{}/products", self.base_url);
            tracing::debug!(%url, ?query, "Fetching products");

            let request = self.client.get(&url).query(&query);
            let products: Vec<Product> = self.get_json(request, "products").await?;

            tracing::debug!(count = products.len(), "Fetched products");
            Ok(products)
        })
    }

    fn fetch_category_list(&self, category_id: Option<u64>) -> CatalogFuture<'_, Vec<Category>> {
        Box::pin(async move {
            match category_id {
                None => {
                    let url = format!("{}/categories", self.base_url);
                    tracing::debug!(%url, "Fetching categories");
                    self.get_json(self.client.get(&url), "categories").await
                },
                Some(id) => {
                    let url = format!("{}/categories/{id}", self.base_url);
                    tracing::debug!(%url, "Fetching category");
                    let category: Category = self
                        .get_json(self.client.get(&url), &format!("category {id}"))
                        .await?;
                    Ok(vec![category])
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpCatalogClient::new(&CatalogConfig::new("http://localhost:8080/api/v1/"));
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_default_client_targets_public_catalog() {
        let client = HttpCatalogClient::new(&CatalogConfig::default());
        assert_eq!(client.base_url(), crate::config::DEFAULT_BASE_URL);
    }
}
