//! # REST API
//!
//! HTTP ingress for iiko webhooks, built on axum.
//!
//! # Endpoints
//!
//! - `POST /webhooks/iiko` - Receive a webhook notification (path configurable)
//! - `GET /health` - Health check endpoint
//!
//! # Usage
//!
//! ```no_run
//! use iiko_client::api::rest::{AppState, create_router};
//! use iiko_client::application::webhooks::{HandlerRegistry, WebhookIngress};
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let ingress = WebhookIngress::from(HandlerRegistry::with_secret("s3cret"));
//! let router = create_router(Arc::new(AppState::new(ingress)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, DEFAULT_WEBHOOK_PATH, HealthResponse, StatusResponse};
pub use routes::{REQUEST_ID_HEADER, create_router};
