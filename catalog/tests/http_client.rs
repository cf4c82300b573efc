//! Integration tests for `HttpCatalogClient` against a mock HTTP server

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use luxelane_catalog::{
    CatalogClient, CatalogConfig, CatalogError, HttpCatalogClient, Money, ProductQuery, SortOrder,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clothes() -> Value {
    json!({
        "id": 1,
        "name": "Clothes",
        "slug": "clothes",
        "image": "https://i.imgur.com/QkIa5tT.jpeg"
    })
}

fn product(id: u64, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "price": price,
        "description": "A fine product.",
        "category": clothes(),
        "images": [format!("https://i.imgur.com/{id}.jpeg")]
    })
}

async fn client_for(server: &MockServer) -> HttpCatalogClient {
    HttpCatalogClient::new(&CatalogConfig::new(server.uri()))
}

#[tokio::test]
async fn fetch_products_sends_composed_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("title", "shirt"))
        .and(query_param("categorySlug", "clothes"))
        .and(query_param("price_min", "10"))
        .and(query_param("sort", "desc"))
        .and(query_param_is_missing("price_max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product(1, "Classic Shirt", 44.0),
            product(2, "Linen Shirt", 19.99),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let products = client
        .fetch_all_products(ProductQuery {
            title: "shirt".to_string(),
            category_slug: Some("clothes".to_string()),
            price_min: Some("10".to_string()),
            price_max: None,
            sort: Some(SortOrder::Desc),
        })
        .await
        .unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[1].price, Money::from_cents(1999));
    assert_eq!(products[0].category.slug, "clothes");
}

#[tokio::test]
async fn unfiltered_query_sends_empty_title_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("title", ""))
        .and(query_param_is_missing("categorySlug"))
        .and(query_param_is_missing("sort"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let products = client
        .fetch_all_products(ProductQuery::unfiltered())
        .await
        .unwrap();

    assert!(products.is_empty());
}

#[tokio::test]
async fn server_error_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .fetch_all_products(ProductQuery::unfiltered())
        .await
        .unwrap_err();

    assert_eq!(
        error,
        CatalogError::ApiError {
            status: 500,
            message: "upstream exploded".to_string(),
        }
    );
    assert_eq!(error.to_string(), "API error (status 500): upstream exploded");
}

#[tokio::test]
async fn any_success_status_is_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(203).set_body_json(json!([product(5, "Tee", 12.5)])),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let products = client
        .fetch_all_products(ProductQuery::unfiltered())
        .await
        .unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Tee");
    assert_eq!(products[0].price, Money::from_cents(1250));
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"products": []})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .fetch_all_products(ProductQuery::unfiltered())
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::ResponseParseFailed(_)));
}

#[tokio::test]
async fn unreachable_server_maps_to_request_failed() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;
    drop(server);

    let error = client
        .fetch_all_products(ProductQuery::unfiltered())
        .await
        .unwrap_err();

    assert!(matches!(error, CatalogError::RequestFailed(_)));
}

#[tokio::test]
async fn category_list_without_id_lists_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            clothes(),
            {"id": 2, "name": "Electronics", "slug": "electronics"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let categories = client.fetch_category_list(None).await.unwrap();

    assert_eq!(categories.len(), 2);
    assert_eq!(
        categories[0].image.as_deref(),
        Some("https://i.imgur.com/QkIa5tT.jpeg")
    );
    assert_eq!(categories[1].image, None);
}

#[tokio::test]
async fn category_by_id_wraps_single_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clothes()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let categories = client.fetch_category_list(Some(1)).await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Clothes");
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client.fetch_category_list(Some(99)).await.unwrap_err();

    assert_eq!(error, CatalogError::NotFound("category 99".to_string()));
}
