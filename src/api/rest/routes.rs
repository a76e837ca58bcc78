//! # REST Routes
//!
//! Router setup and middleware.
//!
//! Requests flow through middleware in order:
//! 1. Request ID generation
//! 2. Request/response tracing
//! 3. CORS handling
//! 4. Handler execution

use super::handlers::{AppState, health_check, receive_webhook};
use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Response header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Creates the router with webhook and health routes.
///
/// # Example
///
/// ```
/// use iiko_client::api::rest::{AppState, create_router};
/// use iiko_client::application::webhooks::{HandlerRegistry, WebhookIngress};
/// use std::sync::Arc;
///
/// let ingress = WebhookIngress::from(HandlerRegistry::with_secret("s3cret"));
/// let router = create_router(Arc::new(AppState::new(ingress)));
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, state.secret_header.clone()]);

    Router::new()
        .route("/health", get(health_check))
        .route(&state.webhook_path, post(receive_webhook))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Tags every request and response with a fresh request ID.
async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
