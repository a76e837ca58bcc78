//! End-to-end ingress scenarios: raw bytes in, handler side effects out.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use iiko_client::application::error::{DispatchError, DispatchErrorKind, HandlerResult};
use iiko_client::application::webhooks::{HandlerRegistry, WebhookHandler, WebhookIngress};
use iiko_client::domain::events::{StopListUpdateInfo, WebhookEvent, WebhookEventType};
use iiko_client::domain::value_objects::{DeliveryStatus, EventTime, OrganizationId};
use iiko_client::infrastructure::iiko::api::deliveries::DeliveryOrderInfo;
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

const ORG: &str = "7bc05553-4b68-44e8-b7bc-37be63c6d9e9";
const SECRET: &str = "s3cret";

fn stop_list_body() -> Vec<u8> {
    serde_json::json!({
        "eventType": "StopListUpdate",
        "eventTime": "2024-01-02 10:00:00.123",
        "organizationId": ORG,
        "correlationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "eventInfo": {
            "terminalGroupsStopListsUpdates": [
                { "id": "1ca9a4a5-0e5b-4b38-a1c8-0c8f7c5e3d2a", "isFull": true },
                { "id": "2ca9a4a5-0e5b-4b38-a1c8-0c8f7c5e3d2a", "isFull": false }
            ]
        }
    })
    .to_string()
    .into_bytes()
}

fn order_update_body() -> Vec<u8> {
    serde_json::json!({
        "eventType": "DeliveryOrderUpdate",
        "eventTime": "2024-01-02T10:05:00.000Z",
        "organizationId": ORG,
        "correlationId": "4fa85f64-5717-4562-b3fc-2c963f66afa6",
        "eventInfo": {
            "id": "5fa85f64-5717-4562-b3fc-2c963f66afa6",
            "externalNumber": "W-1001",
            "organizationId": ORG,
            "timestamp": 1704189900000_i64,
            "creationStatus": "Success",
            "order": {
                "status": "OnWay",
                "phone": "+70000000000"
            }
        }
    })
    .to_string()
    .into_bytes()
}

/// Collects what handlers saw.
#[derive(Default)]
struct Seen(Mutex<Vec<String>>);

impl Seen {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock())
    }
}

struct StopListRecorder(Arc<Seen>);

#[async_trait::async_trait]
impl WebhookHandler for StopListRecorder {
    async fn handle(&self, event: &WebhookEvent) -> HandlerResult {
        let info: StopListUpdateInfo = event.decode_info()?;
        for id in info.full_reloads() {
            self.0.push(format!("reload {id}"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn stop_list_update_reaches_typed_handler() {
    let seen = Arc::new(Seen::default());
    let registry = HandlerRegistry::with_secret(SECRET);
    registry.register(
        WebhookEventType::StopListUpdate,
        "stop-list",
        StopListRecorder(Arc::clone(&seen)),
    );
    let ingress = WebhookIngress::from(registry);

    let event = ingress.handle(&stop_list_body(), SECRET).await.unwrap();

    assert_eq!(event.event_type(), &WebhookEventType::StopListUpdate);
    assert_eq!(event.organization_id(), ORG.parse::<OrganizationId>().unwrap());
    assert_eq!(event.event_time().to_vendor_format(), "2024-01-02 10:00:00.123");
    assert_eq!(seen.take(), vec!["reload 1ca9a4a5-0e5b-4b38-a1c8-0c8f7c5e3d2a"]);
}

#[tokio::test]
async fn failing_handler_stops_the_chain() {
    let seen = Arc::new(Seen::default());
    let registry = HandlerRegistry::with_secret(SECRET);

    let first = Arc::clone(&seen);
    registry.register_fn(WebhookEventType::StopListUpdate, "h1", move |_| {
        first.push("h1");
        Err("boom".into())
    });
    let second = Arc::clone(&seen);
    registry.register_fn(WebhookEventType::StopListUpdate, "h2", move |_| {
        second.push("h2");
        Ok(())
    });

    let err = WebhookIngress::from(registry)
        .handle(&stop_list_body(), SECRET)
        .await
        .unwrap_err();

    match &err {
        DispatchError::HandlerFailed {
            handler,
            event_type,
            source,
        } => {
            assert_eq!(handler, "h1");
            assert_eq!(event_type, &WebhookEventType::StopListUpdate);
            assert_eq!(source.to_string(), "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.status_code(), 500);
    assert_eq!(seen.take(), vec!["h1"]);
}

#[tokio::test]
async fn delivery_order_update_decodes_order_info() {
    let seen = Arc::new(Seen::default());
    let registry = HandlerRegistry::with_secret(SECRET);
    let sink = Arc::clone(&seen);
    registry.register_fn(WebhookEventType::DeliveryOrderUpdate, "orders", move |event| {
        let info = DeliveryOrderInfo::from_event(event)?;
        assert_eq!(info.status(), Some(DeliveryStatus::OnWay));
        sink.push(info.external_number.unwrap_or_default());
        Ok(())
    });

    WebhookIngress::from(registry)
        .handle(&order_update_body(), SECRET)
        .await
        .unwrap();

    assert_eq!(seen.take(), vec!["W-1001"]);
}

#[tokio::test]
async fn unknown_event_type_routes_by_name() {
    let registry = HandlerRegistry::new();
    let seen = Arc::new(Seen::default());
    let sink = Arc::clone(&seen);
    registry.register_fn(
        WebhookEventType::from("ReserveUpdate"),
        "reserves",
        move |event| {
            sink.push(event.event_type().to_string());
            Ok(())
        },
    );

    let body = serde_json::json!({
        "eventType": "ReserveUpdate",
        "eventTime": "2024-01-02 10:00:00",
        "organizationId": ORG,
        "correlationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "eventInfo": {}
    })
    .to_string();

    WebhookIngress::from(registry)
        .handle(body.as_bytes(), "")
        .await
        .unwrap();
    assert_eq!(seen.take(), vec!["ReserveUpdate"]);
}

#[tokio::test]
async fn rejections_carry_their_kind() {
    let registry = HandlerRegistry::with_secret(SECRET);
    registry.register_fn(WebhookEventType::StopListUpdate, "noop", |_| Ok(()));
    let ingress = WebhookIngress::from(registry);

    let unauthorized = ingress.handle(&stop_list_body(), "nope").await.unwrap_err();
    assert_eq!(unauthorized.kind(), DispatchErrorKind::Unauthorized);

    let malformed = ingress.handle(b"{not json", SECRET).await.unwrap_err();
    assert_eq!(malformed.kind(), DispatchErrorKind::MalformedPayload);

    let bad_time = serde_json::json!({
        "eventType": "StopListUpdate",
        "eventTime": "yesterday",
        "organizationId": ORG,
        "correlationId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "eventInfo": {}
    })
    .to_string();
    let err = ingress.handle(bad_time.as_bytes(), SECRET).await.unwrap_err();
    assert_eq!(err.kind(), DispatchErrorKind::MalformedTimestamp);
    assert!(err.to_string().contains("yesterday"));

    let unrouted = ingress.handle(&order_update_body(), SECRET).await.unwrap_err();
    assert_eq!(unrouted.kind(), DispatchErrorKind::NoHandlersRegistered);
}

proptest! {
    #[test]
    fn vendor_format_survives_reparse(millis in 1i64..4_102_444_800_000) {
        let ts = EventTime::from_millis(millis).unwrap();
        let reparsed = EventTime::parse(&ts.to_vendor_format()).unwrap();
        prop_assert_eq!(reparsed, ts);
    }

    #[test]
    fn unknown_type_names_are_preserved(name in "[A-Z][A-Za-z]{2,24}") {
        let event_type = WebhookEventType::from(name.as_str());
        prop_assert_eq!(event_type.as_str(), name.as_str());
        let json = serde_json::to_string(&event_type).unwrap();
        let back: WebhookEventType = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, event_type);
    }
}
