//! # iiko Client
//!
//! Typed client for the iiko Cloud restaurant and delivery API, plus a
//! webhook ingestion core that routes inbound notifications to registered
//! handlers.
//!
//! # Architecture
//!
//! - [`domain`]: webhook envelope, timestamps, identifiers, vendor enums
//! - [`application`]: handler registry, dispatch, ingress and their errors
//! - [`infrastructure`]: outbound iiko API client and endpoint DTOs
//! - [`api`]: axum router exposing the webhook endpoint
//! - [`config`], [`telemetry`]: settings and logging setup
//!
//! # Example
//!
//! ```
//! use iiko_client::application::webhooks::{HandlerRegistry, WebhookIngress};
//! use iiko_client::domain::events::{WebhookEvent, WebhookEventType};
//!
//! # tokio_test::block_on(async {
//! let registry = HandlerRegistry::with_secret("s3cret");
//! registry.register_fn(WebhookEventType::StopListUpdate, "h1", |_event: &WebhookEvent| Ok(()));
//! let ingress = WebhookIngress::from(registry);
//!
//! let body = br#"{
//!     "eventType": "StopListUpdate",
//!     "eventTime": "2024-01-02 10:00:00.123",
//!     "organizationId": "11111111-1111-1111-1111-111111111111",
//!     "correlationId": "22222222-2222-2222-2222-222222222222",
//!     "eventInfo": {"terminalGroupsStopListsUpdates": []}
//! }"#;
//! let event = ingress.handle(body, "s3cret").await.unwrap();
//! assert_eq!(event.event_type(), &WebhookEventType::StopListUpdate);
//! # });
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
