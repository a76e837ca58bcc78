//! # REST Handlers
//!
//! Axum handlers for webhook ingestion and health checks.

use crate::application::error::DispatchError;
use crate::application::webhooks::{HandlerRegistry, WebhookIngress};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Default path the vendor posts webhooks to.
pub const DEFAULT_WEBHOOK_PATH: &str = "/webhooks/iiko";

/// Shared state of the REST router.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Decodes and dispatches webhook bodies.
    pub ingress: WebhookIngress,
    /// Header carrying the shared secret.
    pub secret_header: HeaderName,
    /// Route the webhook handler is mounted on.
    pub webhook_path: String,
}

impl AppState {
    /// Creates state with the default secret header and path.
    #[must_use]
    pub fn new(ingress: WebhookIngress) -> Self {
        Self {
            ingress,
            secret_header: AUTHORIZATION,
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
        }
    }

    /// Sets the header carrying the shared secret.
    #[must_use]
    pub fn with_secret_header(mut self, secret_header: HeaderName) -> Self {
        self.secret_header = secret_header;
        self
    }

    /// Sets the webhook route.
    #[must_use]
    pub fn with_webhook_path(mut self, webhook_path: impl Into<String>) -> Self {
        self.webhook_path = webhook_path.into();
        self
    }
}

/// Body of every webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// `success` or `error`.
    pub status: String,
    /// Human readable detail.
    pub message: String,
}

impl StatusResponse {
    /// Success body.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
            message: "Webhook processed successfully".to_string(),
        }
    }

    /// Error body.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
}

/// Health check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Receives one webhook notification.
///
/// Answers 200 once every handler succeeded, 401 for a wrong secret, 400
/// for an undecodable body, and 500 when no handler is registered or one
/// failed.
#[instrument(
    name = "receive_webhook",
    skip(state, headers, body),
    fields(content_length = body.len())
)]
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let secret = supplied_secret(&headers, &state.secret_header, state.ingress.registry());

    match state.ingress.handle(&body, secret).await {
        Ok(event) => {
            info!(
                event_type = %event.event_type(),
                correlation_id = %event.correlation_id(),
                "webhook processed"
            );
            (StatusCode::OK, Json(StatusResponse::success())).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// Reads the secret header.
///
/// A `Bearer ` prefix is dropped unless the raw value is itself the
/// configured secret.
fn supplied_secret<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
    registry: &HandlerRegistry,
) -> &'a str {
    let raw = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim();

    match raw.strip_prefix("Bearer ") {
        Some(token) if !registry.accepts_secret(raw) => token,
        _ => raw,
    }
}

fn error_response(err: &DispatchError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(kind = %err.kind(), error = %err, "webhook dispatch failed");
    } else {
        warn!(kind = %err.kind(), error = %err, "webhook rejected");
    }

    (status, Json(StatusResponse::error(err.to_string()))).into_response()
}
