#![allow(clippy::unwrap_used)]
// Integration tests for `ProductsClient` using wiremock.

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_api::{Error, ProductCreateRequest, ProductUpdateRequest, ProductsClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ProductsClient) {
    let server = MockServer::start().await;
    let client = ProductsClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

fn product_json(id: &str, name: &str, price: f64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "price": price,
        "category": "Other",
        "imageUrl": "",
        "stock": 5,
        "rating": 4.0,
        "tags": [],
        "createdAt": "2024-06-15T10:30:00Z",
        "updatedAt": "2024-06-15T10:30:00Z"
    })
}

// ── List ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products_with_total_count() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("_page", "2"))
        .and(query_param("_limit", "8"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "25")
                .set_body_json(json!([
                    product_json("9", "Item 9", 9.0),
                    product_json("10", "Item 10", 10.0)
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = client
        .list_products(&[
            ("_page".to_owned(), "2".to_owned()),
            ("_limit".to_owned(), "8".to_owned()),
        ])
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "9");
    assert_eq!(page.total_count, Some(25));
}

#[tokio::test]
async fn test_list_products_without_total_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("1", "P1", 10.0)
        ])))
        .mount(&server)
        .await;

    let page = client.list_products(&[]).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_count, None);
}

#[tokio::test]
async fn test_list_products_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.list_products(&[]).await;
    assert!(
        matches!(result, Err(Error::Api { status: 500, .. })),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_products_bad_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_products(&[]).await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Single product ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_product() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("42", "Desk", 99.5)))
        .mount(&server)
        .await;

    let product = client.get_product("42").await.unwrap();
    assert_eq!(product.name, "Desk");
    assert!((product.price - 99.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_get_product_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client.get_product("missing").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_product() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/products"))
        .and(body_partial_json(json!({ "name": "Widget", "stock": 3 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(product_json("77", "Widget", 9.99)))
        .expect(1)
        .mount(&server)
        .await;

    let now = Utc::now();
    let created = client
        .create_product(&ProductCreateRequest {
            name: "Widget".into(),
            description: String::new(),
            price: 9.99,
            category: "Other".into(),
            image_url: String::new(),
            stock: 3,
            rating: 0.0,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    assert_eq!(created.id, "77");
}

#[tokio::test]
async fn test_update_product_sends_partial_body() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/products/5"))
        .and(body_partial_json(json!({ "price": 15.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("5", "Lamp", 15.0)))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client
        .update_product(
            "5",
            &ProductUpdateRequest {
                price: Some(15.0),
                updated_at: Utc::now(),
                ..ProductUpdateRequest::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, "5");
}

#[tokio::test]
async fn test_delete_product() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_product("5").await.unwrap();
}

#[tokio::test]
async fn test_delete_product_failure() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/products/5"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.delete_product("5").await.unwrap_err();
    assert!(err.is_transient());
}
