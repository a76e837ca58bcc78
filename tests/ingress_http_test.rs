//! HTTP behaviour of the webhook router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderName, Request, StatusCode, header};
use iiko_client::api::rest::{AppState, HealthResponse, REQUEST_ID_HEADER, StatusResponse, create_router};
use iiko_client::application::webhooks::{HandlerRegistry, WebhookIngress};
use iiko_client::domain::events::WebhookEventType;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

const SECRET: &str = "s3cret";

fn body(event_type: &str) -> String {
    serde_json::json!({
        "eventType": event_type,
        "eventTime": "2024-01-02 10:00:00.123",
        "organizationId": "7bc05553-4b68-44e8-b7bc-37be63c6d9e9",
        "correlationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "eventInfo": { "terminalGroupsStopListsUpdates": [] }
    })
    .to_string()
}

fn router_with(registry: HandlerRegistry) -> Router {
    create_router(Arc::new(AppState::new(WebhookIngress::from(registry))))
}

fn counting_router(calls: &Arc<AtomicUsize>) -> Router {
    let registry = HandlerRegistry::with_secret(SECRET);
    let counter = Arc::clone(calls);
    registry.register_fn(WebhookEventType::StopListUpdate, "count", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    registry.register_fn(WebhookEventType::DeliveryOrderError, "fail", |_| {
        Err("downstream unavailable".into())
    });
    router_with(registry)
}

fn post(secret: Option<&str>, payload: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhooks/iiko")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header(header::AUTHORIZATION, secret);
    }
    builder.body(payload.into()).unwrap()
}

async fn read_status(response: axum::response::Response) -> StatusResponse {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn accepted_webhook_returns_200() {
    let calls = Arc::new(AtomicUsize::new(0));
    let response = counting_router(&calls)
        .oneshot(post(Some(SECRET), body("StopListUpdate")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(read_status(response).await, StatusResponse::success());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bearer_prefix_is_accepted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let response = counting_router(&calls)
        .oneshot(post(Some("Bearer s3cret"), body("StopListUpdate")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn secret_that_starts_with_bearer_matches_exactly() {
    let registry = HandlerRegistry::with_secret("Bearer abc");
    registry.register_fn(WebhookEventType::StopListUpdate, "noop", |_| Ok(()));
    let app = router_with(registry);

    let exact = app
        .clone()
        .oneshot(post(Some("Bearer abc"), body("StopListUpdate")))
        .await
        .unwrap();
    assert_eq!(exact.status(), StatusCode::OK);

    let stripped = app
        .oneshot(post(Some("abc"), body("StopListUpdate")))
        .await
        .unwrap();
    assert_eq!(stripped.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_or_missing_secret_returns_401() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(&calls);

    let wrong = app
        .clone()
        .oneshot(post(Some("guess"), body("StopListUpdate")))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let missing = app.oneshot(post(None, body("StopListUpdate"))).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(read_status(missing).await.status, "error");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_body_returns_400() {
    let calls = Arc::new(AtomicUsize::new(0));
    let response = counting_router(&calls)
        .oneshot(post(Some(SECRET), "{\"eventType\":"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_status(response).await.message.starts_with("malformed payload"));
}

#[tokio::test]
async fn unrouted_or_failed_dispatch_returns_500() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = counting_router(&calls);

    let unrouted = app
        .clone()
        .oneshot(post(Some(SECRET), body("DeliveryOrderUpdate")))
        .await
        .unwrap();
    assert_eq!(unrouted.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let failed = app
        .oneshot(post(Some(SECRET), body("DeliveryOrderError")))
        .await
        .unwrap();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(read_status(failed).await.message.contains("'fail'"));
}

#[tokio::test]
async fn custom_secret_header_and_path() {
    let registry = HandlerRegistry::with_secret(SECRET);
    registry.register_fn(WebhookEventType::StopListUpdate, "noop", |_| Ok(()));
    let state = AppState::new(WebhookIngress::from(registry))
        .with_secret_header(HeaderName::from_static("x-iiko-token"))
        .with_webhook_path("/hooks");
    let app = create_router(Arc::new(state));

    let request = Request::builder()
        .method("POST")
        .uri("/hooks")
        .header("x-iiko-token", SECRET)
        .body(Body::from(body("StopListUpdate")))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let old_path = app
        .oneshot(post(Some(SECRET), body("StopListUpdate")))
        .await
        .unwrap();
    assert_eq!(old_path.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_check_is_open() {
    let app = router_with(HandlerRegistry::with_secret(SECRET));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
}
