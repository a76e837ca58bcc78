//! # Webhook Handler Port
//!
//! The [`WebhookHandler`] trait is what callers implement to react to events.
//! Plain closures are adapted with [`FnHandler`].
//!
//! # Examples
//!
//! ```
//! use iiko_client::application::error::HandlerResult;
//! use iiko_client::application::webhooks::WebhookHandler;
//! use iiko_client::domain::events::WebhookEvent;
//!
//! struct LogOrder;
//!
//! #[async_trait::async_trait]
//! impl WebhookHandler for LogOrder {
//!     async fn handle(&self, event: &WebhookEvent) -> HandlerResult {
//!         println!("order event {}", event.correlation_id());
//!         Ok(())
//!     }
//! }
//! ```

use crate::application::error::HandlerResult;
use crate::domain::events::WebhookEvent;
use async_trait::async_trait;
use std::sync::Arc;

/// Reacts to one webhook event.
///
/// Handlers for the same event type run one after another in registration
/// order. Returning an error stops the remaining handlers for that event.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Processes the event.
    ///
    /// # Errors
    ///
    /// Any error aborts the dispatch and is reported to the dispatch caller
    /// wrapped with the handler name and event type.
    async fn handle(&self, event: &WebhookEvent) -> HandlerResult;
}

#[async_trait]
impl<T: WebhookHandler + ?Sized> WebhookHandler for Arc<T> {
    async fn handle(&self, event: &WebhookEvent) -> HandlerResult {
        (**self).handle(event).await
    }
}

/// Adapts a synchronous closure into a [`WebhookHandler`].
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&WebhookEvent) -> HandlerResult + Send + Sync,
{
    /// Wraps the closure.
    #[must_use]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> WebhookHandler for FnHandler<F>
where
    F: Fn(&WebhookEvent) -> HandlerResult + Send + Sync,
{
    async fn handle(&self, event: &WebhookEvent) -> HandlerResult {
        (self.0)(event)
    }
}
