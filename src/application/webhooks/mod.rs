//! # Webhook Dispatch
//!
//! Handler registration, secret-checked dispatch and byte-level ingress for
//! iiko webhook notifications.

pub mod handler;
pub mod ingress;
pub mod registry;

pub use handler::{FnHandler, WebhookHandler};
pub use ingress::WebhookIngress;
pub use registry::HandlerRegistry;
