//! End-to-end tests over real HTTP.
//!
//! These tests run the executor and the pagination controller against a
//! wiremock server standing in for the Admin GraphQL endpoint.

use std::time::Duration;

use serde_json::{json, Map, Value};
use shopify_paginator::clients::GraphqlTransport;
use shopify_paginator::{
    AccessToken, ApiHost, ApiVersion, ClientConfig, FetchOptions, GraphqlError, GraphqlRequest,
    HttpTransport, PaginationConfig, PaginationController, PaginationError, RequestExecutor,
    ShopDomain, StopReason, TransportError,
};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2025-07/graphql.json";

const PRODUCTS_QUERY: &str = r"
query($first: Int!, $after: String) {
  products(first: $first, after: $after) {
    edges { node { id title } }
    pageInfo { hasNextPage endCursor }
  }
}";

/// Creates a config whose requests go to the mock server.
fn create_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new("shpat_test_token").unwrap())
        .api_version(ApiVersion::V2025_07)
        .api_host(ApiHost::new(server.uri()).unwrap())
        .build()
        .unwrap()
}

/// Creates a controller with a short backoff so retries don't slow the suite.
fn create_controller(server: &MockServer) -> PaginationController {
    let config = PaginationConfig::builder()
        .base_backoff(Duration::from_millis(10))
        .max_backoff(Duration::from_millis(50))
        .build()
        .unwrap();
    PaginationController::with_config(RequestExecutor::from_config(&create_config(server)), config)
}

fn products_page(ids: std::ops::Range<u32>, has_next: bool, cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = ids
        .map(|id| {
            json!({
                "cursor": format!("cursor-{id}"),
                "node": { "id": format!("gid://shopify/Product/{id}"), "title": format!("Product {id}") }
            })
        })
        .collect();

    json!({
        "data": { "products": {
            "edges": edges,
            "pageInfo": { "hasNextPage": has_next, "endCursor": cursor }
        }},
        "extensions": { "cost": {
            "requestedQueryCost": 52,
            "actualQueryCost": 12,
            "throttleStatus": {
                "maximumAvailable": 2000.0,
                "currentlyAvailable": 1988,
                "restoreRate": 100.0
            }
        }}
    })
}

fn product_ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// HttpTransport Tests
// ============================================================================

#[tokio::test]
async fn test_transport_sends_auth_and_client_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test_token"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "application/json"))
        .and(header_regex("User-Agent", r"^Shopify GraphQL Paginator v\S+ \| Rust$"))
        .and(body_partial_json(json!({ "variables": { "first": 3 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&create_config(&server));
    let mut variables = Map::new();
    variables.insert("first".to_string(), json!(3));

    let response = assert_ok!(
        transport
            .post_graphql(&GraphqlRequest::new("query { ok }", variables))
            .await
    );

    assert_eq!(response.code, 200);
    assert_eq!(response.body, json!({ "data": { "ok": true } }));
}

#[tokio::test]
async fn test_transport_parses_rate_limit_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2.0")
                .insert_header("X-Request-Id", "req-429")
                .set_body_json(json!({ "errors": "Throttled" })),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&create_config(&server));
    let response = assert_ok!(
        transport
            .post_graphql(&GraphqlRequest::new("query { ok }", Map::new()))
            .await
    );

    assert_eq!(response.code, 429);
    assert_eq!(response.retry_request_after, Some(2.0));
    assert_eq!(response.request_id(), Some("req-429"));
}

#[tokio::test]
async fn test_transport_keeps_unparseable_error_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let executor = RequestExecutor::from_config(&create_config(&server));
    let result = executor.execute("query { ok }", Map::new()).await;

    match result {
        Err(GraphqlError::Transport(error)) => {
            assert_eq!(error.status(), Some(502));
            assert!(error.to_string().contains("Bad Gateway"));
        }
        other => panic!("expected Transport error, got {other:?}"),
    }
}

// ============================================================================
// RequestExecutor Tests
// ============================================================================

#[tokio::test]
async fn test_executor_reads_data_and_cost() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(0..2, false, None)))
        .mount(&server)
        .await;

    let executor = RequestExecutor::from_config(&create_config(&server));
    let result = assert_ok!(executor.execute(PRODUCTS_QUERY, Map::new()).await);

    let cost = result.cost.unwrap();
    assert_eq!(cost.actual_query_cost, Some(12.0));
    assert!((cost.throttle_status.currently_available - 1988.0).abs() < f64::EPSILON);
    assert_eq!(
        result.data["products"]["edges"].as_array().map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn test_executor_maps_unauthorized_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "errors": "[API] Invalid API key or access token" })),
        )
        .mount(&server)
        .await;

    let executor = RequestExecutor::from_config(&create_config(&server));
    let error = assert_err!(executor.execute(PRODUCTS_QUERY, Map::new()).await);

    assert!(matches!(error, GraphqlError::Authentication(ref e) if e.code == 401));
    assert!(!error.is_recoverable());
}

// ============================================================================
// PaginationController Tests
// ============================================================================

#[tokio::test]
async fn test_fetches_every_page_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(
            0..2,
            true,
            Some("cursor-1"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(
            2..4,
            true,
            Some("cursor-3"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-3" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(4..5, false, None)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = assert_ok!(
        create_controller(&server)
            .fetch_all_with_summary(
                "products",
                PRODUCTS_QUERY,
                Map::new(),
                FetchOptions::new().batch_size(2),
            )
            .await
    );

    assert_eq!(
        product_ids(&outcome.items),
        (0..5)
            .map(|id| format!("gid://shopify/Product/{id}"))
            .collect::<Vec<_>>()
    );
    assert_eq!(outcome.summary.pages_fetched, 3);
    assert_eq!(outcome.summary.stop_reason, StopReason::NoNextPage);
    assert!((outcome.summary.final_budget.maximum_available - 2000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_rate_limited_page_is_retried_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "errors": "Throttled" })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(0..3, false, None)))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = assert_ok!(
        create_controller(&server)
            .fetch_all_with_summary("products", PRODUCTS_QUERY, Map::new(), FetchOptions::new())
            .await
    );

    assert_eq!(outcome.items.len(), 3);
    assert_eq!(outcome.summary.rate_limit_retries, 1);
    assert_eq!(outcome.summary.backoff_wait, Duration::from_millis(10));
}

#[tokio::test]
async fn test_throttled_graphql_error_is_retried_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "message": "Throttled",
                "extensions": { "code": "THROTTLED", "documentation": "https://shopify.dev/api/usage/rate-limits" }
            }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(0..1, false, None)))
        .mount(&server)
        .await;

    let items = assert_ok!(
        create_controller(&server)
            .fetch_all("products", PRODUCTS_QUERY, Map::new(), FetchOptions::new())
            .await
    );

    assert_eq!(product_ids(&items), vec!["gid://shopify/Product/0"]);
}

#[tokio::test]
async fn test_missing_connection_over_http_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "products": null } })))
        .mount(&server)
        .await;

    let outcome = assert_ok!(
        create_controller(&server)
            .fetch_all_with_summary("products", PRODUCTS_QUERY, Map::new(), FetchOptions::new())
            .await
    );

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.summary.stop_reason, StopReason::ConnectionMissing);
}

#[tokio::test]
async fn test_graphql_errors_abort_fetch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [
                { "message": "Field 'titel' doesn't exist on type 'Product'" },
                { "message": "Variable $first is declared but not used" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        create_controller(&server)
            .fetch_all("products", PRODUCTS_QUERY, Map::new(), FetchOptions::new())
            .await
    );

    match error {
        PaginationError::Graphql(GraphqlError::Api(api_error)) => {
            assert_eq!(
                api_error.message,
                "Field 'titel' doesn't exist on type 'Product', Variable $first is declared but not used"
            );
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_errors_abort_fetch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Internal Server Error" })))
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        create_controller(&server)
            .fetch_all("products", PRODUCTS_QUERY, Map::new(), FetchOptions::new())
            .await
    );

    assert!(matches!(
        error,
        PaginationError::Graphql(GraphqlError::Transport(ref e)) if e.status() == Some(500)
    ));
}

#[tokio::test]
async fn test_non_json_success_body_aborts_fetch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(products_page(
            1..4,
            true,
            Some("cursor-2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-2" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>upstream proxy error</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = assert_err!(
        create_controller(&server)
            .fetch_all_with_summary(
                "products",
                PRODUCTS_QUERY,
                Map::new(),
                FetchOptions::new().batch_size(3),
            )
            .await
    );

    match error {
        PaginationError::Graphql(GraphqlError::Transport(ref e)) => {
            assert_eq!(e.status(), Some(200));
            assert!(matches!(e, TransportError::InvalidBody { .. }));
        }
        other => panic!("expected Transport error, got {other:?}"),
    }
}
