//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain::TaxRate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = api::create_default_state(TaxRate::STANDARD);
    api::create_app(state, get_metrics_handle())
}

/// Sends one request and returns the status with the parsed JSON body
/// (`Value::Null` when the body is empty).
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_product(app: &axum::Router, name: &str, price_cents: i64, stock: i64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(json!({
            "name": name,
            "description": "test product",
            "price_cents": price_cents,
            "stock": stock,
            "category": "test"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn stock_of(app: &axum::Router, id: &str) -> u64 {
    let (status, body) = send(app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    body["stock"].as_u64().unwrap()
}

async fn set_status(app: &axum::Router, order_id: &str, status: &str) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/orders/{order_id}/status"),
        Some(json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_product_crud() {
    let app = setup();
    let id = create_product(&app, "Widget", 1000, 5).await;

    let (status, body) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["price_cents"], 1000);
    assert_eq!(body["price_with_tax_cents"], 1150);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/products/{id}"),
        Some(json!({ "name": "Widget v2", "price_cents": 1200, "stock": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget v2");
    assert_eq!(body["stock"], 9);

    let (status, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
    assert!(body["message"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_invalid_product_is_rejected() {
    let app = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Free lunch", "price_cents": 0, "stock": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Negative", "price_cents": 100, "stock": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Gold bar", "price_cents": i64::MAX, "stock": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (_, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let app = setup();

    let request = Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 400);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let app = setup();
    let product = create_product(&app, "A", 1000, 3).await;

    let order_body = |quantity: u32| {
        json!({
            "user_id": "user-42",
            "shipping_address": "1 Infinite Loop",
            "line_items": [{ "product_id": product, "quantity": quantity }]
        })
    };

    let (status, body) = send(&app, "POST", "/orders", Some(order_body(5))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert_eq!(stock_of(&app, &product).await, 3);

    let (status, order) = send(&app, "POST", "/orders", Some(order_body(2))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["subtotal_cents"], 2000);
    assert_eq!(order["total_with_tax_cents"], 2300);
    assert_eq!(order["line_items"][0]["product_name"], "A");
    assert_eq!(stock_of(&app, &product).await, 1);

    let order_id = order["id"].as_str().unwrap().to_string();

    let (status, _) = set_status(&app, &order_id, "Shipped").await;
    assert_eq!(status, StatusCode::CONFLICT);

    for next in ["Processed", "Shipped", "Delivered"] {
        let (status, body) = set_status(&app, &order_id, next).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], next);
    }

    let (status, body) = set_status(&app, &order_id, "Cancelled").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("Delivered"));
}

#[tokio::test]
async fn test_cancel_restores_stock() {
    let app = setup();
    let product = create_product(&app, "B", 500, 10).await;

    let (status, order) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "user_id": "user-1",
            "shipping_address": "addr",
            "line_items": [{ "product_id": product, "quantity": 4 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stock_of(&app, &product).await, 6);

    let order_id = order["id"].as_str().unwrap();
    let (status, body) = set_status(&app, order_id, "cancelled").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Cancelled");
    assert_eq!(stock_of(&app, &product).await, 10);

    let (status, _) = set_status(&app, order_id, "Cancelled").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(stock_of(&app, &product).await, 10);
}

#[tokio::test]
async fn test_order_validation_and_lookup_errors() {
    let app = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({ "user_id": "u", "shipping_address": "addr", "line_items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "user_id": "u",
            "shipping_address": "addr",
            "line_items": [{ "product_id": "missing", "quantity": 1 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = set_status(&app, "missing-order", "Processed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = set_status(&app, "missing-order", "Lost").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_orders_and_orders_by_user() {
    let app = setup();
    let product = create_product(&app, "C", 100, 10).await;

    for user in ["alice", "alice", "bob"] {
        let (status, _) = send(
            &app,
            "POST",
            "/orders",
            Some(json!({
                "user_id": user,
                "shipping_address": "addr",
                "line_items": [{ "product_id": product, "quantity": 1 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/orders/alice", None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["user_id"] == "alice"));

    let (status, body) = send(&app, "GET", "/orders/nobody", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_register_and_login() {
    let app = setup();
    let credentials = json!({ "email": "shopper@example.com", "password": "hunter2" });

    let (status, body) = send(&app, "POST", "/users/register", Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "shopper@example.com");
    assert_eq!(body["roles"], json!(["customer"]));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let (status, body) = send(&app, "POST", "/users/register", Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    let (status, body) = send(&app, "POST", "/users/login", Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "shopper@example.com");

    let (status, wrong) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "email": "shopper@example.com", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["code"], 401);

    let (status, unknown) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "email": "ghost@example.com", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], unknown["message"]);
}

#[tokio::test]
async fn test_register_validation() {
    let app = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/users/register",
        Some(json!({ "email": "", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();
    let product = create_product(&app, "D", 100, 1).await;
    send(
        &app,
        "POST",
        "/orders",
        Some(json!({
            "user_id": "u",
            "shipping_address": "addr",
            "line_items": [{ "product_id": product, "quantity": 1 }]
        })),
    )
    .await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("orders_created_total"));
}
