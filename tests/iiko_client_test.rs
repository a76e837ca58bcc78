//! Client behaviour against a mocked iiko API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use iiko_client::domain::value_objects::OrganizationId;
use iiko_client::infrastructure::iiko::api::customers::CustomerCategoryChangeRequest;
use iiko_client::infrastructure::iiko::api::deliveries::DeliveriesByIdRequest;
use iiko_client::infrastructure::iiko::api::webhooks::WebhookSettingsRequest;
use iiko_client::infrastructure::iiko::{IikoClient, IikoClientConfig, IikoError, RequestOptions};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN: &str = "test-login";
const CORRELATION: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn org() -> OrganizationId {
    "7bc05553-4b68-44e8-b7bc-37be63c6d9e9".parse().unwrap()
}

fn client(server: &MockServer) -> IikoClient {
    IikoClient::new(IikoClientConfig::new(LOGIN).with_base_url(format!("{}/", server.uri())))
        .unwrap()
}

fn token_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "correlationId": CORRELATION,
        "token": token
    }))
}

fn menu_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "correlationId": CORRELATION,
        "externalMenus": [{ "id": "1234", "name": "Delivery" }],
        "priceCategories": []
    }))
}

async fn mount_token(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/1/access_token"))
        .and(body_json(json!({ "apiLogin": LOGIN })))
        .respond_with(token_response(token))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn token_is_acquired_once_and_reused() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/api/2/menu"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(body_json(json!({})))
        .respond_with(menu_response())
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let options = RequestOptions::new();

    let first = client.menu(&options).await.unwrap();
    let second = client.menu(&options).await.unwrap();

    assert_eq!(first.external_menus.len(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn timeout_option_is_sent_in_seconds() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/api/1/webhooks/settings"))
        .and(header("Timeout", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correlationId": CORRELATION,
            "apiLoginName": "integration",
            "webHooksUri": "https://example.com/webhooks/iiko",
            "authToken": "s3cret",
            "webHooksFilter": {
                "stopListUpdateFilter": { "updates": true }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = RequestOptions::new().with_timeout(Duration::from_secs(30));
    let settings = client(&server)
        .webhook_settings(&WebhookSettingsRequest { organization_id: org() }, &options)
        .await
        .unwrap();

    assert_eq!(settings.auth_token, "s3cret");
    assert!(settings.web_hooks_filter.stop_list_update_filter.is_some());
}

#[tokio::test]
async fn rejected_token_is_refreshed_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/access_token"))
        .respond_with(token_response("stale"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1/access_token"))
        .respond_with(token_response("fresh"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/2/menu"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/2/menu"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(menu_response())
        .expect(1)
        .mount(&server)
        .await;

    let menu = client(&server).menu(&RequestOptions::new()).await.unwrap();
    assert_eq!(menu.external_menus[0].name, "Delivery");
}

#[tokio::test]
async fn vendor_error_body_is_surfaced() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/api/1/deliveries/by_id"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "correlationId": CORRELATION,
            "errorDescription": "Organization not found",
            "error": "ORGANIZATION_NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let request = DeliveriesByIdRequest::by_order_ids(org(), vec![Uuid::new_v4()]);
    let err = client(&server)
        .deliveries_by_id(&request, &RequestOptions::new())
        .await
        .unwrap_err();

    match err {
        IikoError::Api {
            status,
            description,
            code,
            correlation_id,
        } => {
            assert_eq!(status, 400);
            assert_eq!(description, "Organization not found");
            assert_eq!(code.as_deref(), Some("ORGANIZATION_NOT_FOUND"));
            assert_eq!(correlation_id.as_deref(), Some(CORRELATION));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_lookup_is_rejected_before_sending() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 0).await;

    let err = client(&server)
        .deliveries_by_id(&DeliveriesByIdRequest::by_order_ids(org(), vec![]), &RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, IikoError::InvalidRequest { .. }));
}

#[tokio::test]
async fn rate_limit_reports_retry_after() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    Mock::given(method("POST"))
        .and(path("/api/2/menu"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
        .mount(&server)
        .await;

    let err = client(&server).menu(&RequestOptions::new()).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(err.retry_after_ms(), Some(2000));
}

#[tokio::test]
async fn bodiless_endpoints_accept_empty_responses() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 1).await;
    let request = CustomerCategoryChangeRequest {
        customer_id: Uuid::new_v4(),
        category_id: Uuid::new_v4(),
        organization_id: org(),
    };
    Mock::given(method("POST"))
        .and(path("/api/1/loyalty/iiko/customer_category/add"))
        .and(body_json(&request))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/1/loyalty/iiko/customer_category/remove"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let options = RequestOptions::new();
    client.add_customer_category(&request, &options).await.unwrap();
    client.remove_customer_category(&request, &options).await.unwrap();
}

#[tokio::test]
async fn bad_login_fails_token_acquisition() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/1/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errorDescription": "Login is not authorized"
        })))
        .mount(&server)
        .await;

    let err = client(&server).access_token().await.unwrap_err();

    assert!(matches!(err, IikoError::Authentication { .. }));
    assert!(err.to_string().contains("Login is not authorized"));
}
