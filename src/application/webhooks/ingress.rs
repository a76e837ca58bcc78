//! # Webhook Ingress
//!
//! Turns raw request bytes into a dispatched event.
//!
//! Decoding happens before the secret check, so a malformed body is reported
//! as such even when the secret is also wrong.

use crate::application::error::DispatchResult;
use crate::application::webhooks::registry::HandlerRegistry;
use crate::domain::events::WebhookEvent;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Decodes inbound webhook bodies and hands them to a [`HandlerRegistry`].
#[derive(Debug, Clone)]
pub struct WebhookIngress {
    registry: Arc<HandlerRegistry>,
}

impl WebhookIngress {
    /// Creates an ingress over `registry`.
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry, for registering handlers.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Decodes `body` and dispatches the event.
    ///
    /// # Errors
    ///
    /// Returns `MalformedPayload` or `MalformedTimestamp` if the body does
    /// not decode, otherwise whatever [`HandlerRegistry::dispatch`] returns.
    #[instrument(skip_all, fields(bytes = body.len()))]
    pub async fn handle(&self, body: &[u8], supplied_secret: &str) -> DispatchResult<WebhookEvent> {
        let event = WebhookEvent::from_slice(body)?;
        debug!(event_type = %event.event_type(), "decoded webhook envelope");

        self.registry.dispatch(&event, supplied_secret).await?;
        Ok(event)
    }
}

impl From<HandlerRegistry> for WebhookIngress {
    fn from(registry: HandlerRegistry) -> Self {
        Self::new(Arc::new(registry))
    }
}
