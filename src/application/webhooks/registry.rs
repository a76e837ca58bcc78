//! # Handler Registry
//!
//! Maps webhook event types to ordered lists of named handlers and routes
//! decoded events to them.
//!
//! The registry is owned by the hosting component; register handlers at
//! startup and share it (usually behind an `Arc`) with the ingress. The map
//! sits behind a read/write lock, and dispatch clones the handler list for
//! the event type before running anything, so registering more handlers
//! while events are being dispatched is safe and never affects a dispatch
//! already in progress.
//!
//! # Examples
//!
//! ```
//! use iiko_client::application::webhooks::HandlerRegistry;
//! use iiko_client::domain::events::{WebhookEvent, WebhookEventType};
//!
//! let registry = HandlerRegistry::with_secret("s3cret");
//! registry.register_fn(WebhookEventType::StopListUpdate, "refresh-menu", |_event: &WebhookEvent| Ok(()));
//!
//! assert_eq!(registry.handler_count(&WebhookEventType::StopListUpdate), 1);
//! assert!(!registry.is_registered(&WebhookEventType::DeliveryOrderUpdate));
//! ```

use crate::application::error::{DispatchError, DispatchResult, HandlerResult};
use crate::application::webhooks::handler::{FnHandler, WebhookHandler};
use crate::domain::events::{WebhookEvent, WebhookEventType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, instrument, warn};

/// A handler together with the name it was registered under.
#[derive(Clone)]
struct HandlerEntry {
    name: Arc<str>,
    handler: Arc<dyn WebhookHandler>,
}

/// Registry of webhook handlers keyed by event type.
///
/// # Invariants
///
/// - Handlers for one event type run in registration order.
/// - Registration only appends; nothing is ever removed.
/// - Dispatch never mutates the registry.
pub struct HandlerRegistry {
    /// Shared secret expected from the sender. Empty disables the check.
    expected_secret: String,
    handlers: RwLock<HashMap<WebhookEventType, Vec<HandlerEntry>>>,
}

impl HandlerRegistry {
    /// Creates a registry that accepts events without a secret.
    #[must_use]
    pub fn new() -> Self {
        Self::with_secret(String::new())
    }

    /// Creates a registry that requires `secret` on every dispatch.
    ///
    /// An empty secret disables the check.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            expected_secret: secret.into(),
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true if dispatch checks the supplied secret.
    #[inline]
    #[must_use]
    pub fn requires_secret(&self) -> bool {
        !self.expected_secret.is_empty()
    }

    /// Returns true if `supplied_secret` passes the secret check.
    ///
    /// The comparison runs in constant time.
    #[must_use]
    pub fn accepts_secret(&self, supplied_secret: &str) -> bool {
        if !self.requires_secret() {
            return true;
        }

        self.expected_secret
            .as_bytes()
            .ct_eq(supplied_secret.as_bytes())
            .into()
    }

    /// Appends a named handler for `event_type`.
    ///
    /// Names need not be unique; every registration is invoked. A known type
    /// spelled as `Other` (e.g. `Other("StopListUpdate")`) is stored under
    /// its proper variant.
    pub fn register<H>(&self, event_type: WebhookEventType, name: impl Into<String>, handler: H)
    where
        H: WebhookHandler + 'static,
    {
        let event_type = WebhookEventType::from(String::from(event_type));
        let name: Arc<str> = Arc::from(name.into());
        debug!(event_type = %event_type, handler = %name, "registering webhook handler");

        let entry = HandlerEntry {
            name,
            handler: Arc::new(handler),
        };
        self.handlers
            .write()
            .entry(event_type)
            .or_default()
            .push(entry);
    }

    /// Appends a synchronous closure as a named handler for `event_type`.
    pub fn register_fn<F>(&self, event_type: WebhookEventType, name: impl Into<String>, f: F)
    where
        F: Fn(&WebhookEvent) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(event_type, name, FnHandler::new(f));
    }

    /// Returns the number of handlers registered for `event_type`.
    #[must_use]
    pub fn handler_count(&self, event_type: &WebhookEventType) -> usize {
        self.handlers
            .read()
            .get(&canonical(event_type))
            .map_or(0, Vec::len)
    }

    /// Returns true if at least one handler is registered for `event_type`.
    #[must_use]
    pub fn is_registered(&self, event_type: &WebhookEventType) -> bool {
        self.handler_count(event_type) > 0
    }

    /// Returns the handler names for `event_type` in invocation order.
    #[must_use]
    pub fn handler_names(&self, event_type: &WebhookEventType) -> Vec<String> {
        self.handlers
            .read()
            .get(&canonical(event_type))
            .map(|entries| entries.iter().map(|e| e.name.to_string()).collect())
            .unwrap_or_default()
    }

    /// Routes an event to its handlers.
    ///
    /// Checks the secret, looks up the handlers for the event type and runs
    /// them in registration order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Unauthorized`] if a secret is configured and
    ///   `supplied_secret` differs. No handler runs.
    /// - [`DispatchError::NoHandlersRegistered`] if nothing is registered for
    ///   the event type.
    /// - [`DispatchError::HandlerFailed`] naming the first handler that
    ///   failed. Handlers before it have already run; handlers after it have
    ///   not.
    #[instrument(
        name = "dispatch_webhook",
        skip(self, event, supplied_secret),
        fields(
            event_type = %event.event_type(),
            organization_id = %event.organization_id(),
            correlation_id = %event.correlation_id(),
        )
    )]
    pub async fn dispatch(&self, event: &WebhookEvent, supplied_secret: &str) -> DispatchResult<()> {
        self.authorize(supplied_secret)?;

        let entries = self.snapshot(event.event_type()).ok_or_else(|| {
            warn!("no handlers registered for event type");
            DispatchError::no_handlers(event.event_type().clone())
        })?;

        for (position, entry) in entries.iter().enumerate() {
            debug!(handler = %entry.name, position, "invoking webhook handler");

            if let Err(source) = entry.handler.handle(event).await {
                warn!(handler = %entry.name, position, error = %source, "webhook handler failed");
                return Err(DispatchError::HandlerFailed {
                    handler: entry.name.to_string(),
                    event_type: event.event_type().clone(),
                    source,
                });
            }
        }

        debug!(handlers = entries.len(), "webhook dispatched");
        Ok(())
    }

    /// Rejects a mismatching secret.
    fn authorize(&self, supplied_secret: &str) -> DispatchResult<()> {
        if self.accepts_secret(supplied_secret) {
            Ok(())
        } else {
            warn!("webhook secret mismatch");
            Err(DispatchError::Unauthorized)
        }
    }

    /// Clones the handler list so no lock is held while handlers run.
    fn snapshot(&self, event_type: &WebhookEventType) -> Option<Vec<HandlerEntry>> {
        self.handlers.read().get(event_type).cloned()
    }
}

/// Maps `Other` spellings of known types onto their variants.
fn canonical(event_type: &WebhookEventType) -> WebhookEventType {
    WebhookEventType::from(event_type.as_str())
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let counts: HashMap<&str, usize> = handlers
            .iter()
            .map(|(event_type, entries)| (event_type.as_str(), entries.len()))
            .collect();

        f.debug_struct("HandlerRegistry")
            .field("requires_secret", &self.requires_secret())
            .field("handlers", &counts)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::application::error::DispatchErrorKind;
    use parking_lot::Mutex;
    use std::error::Error as _;

    const SECRET: &str = "s3cret";

    fn event(event_type: &str) -> WebhookEvent {
        let body = format!(
            r#"{{"eventType":"{event_type}","eventTime":"2024-01-02 10:00:00.123","organizationId":"11111111-1111-1111-1111-111111111111","correlationId":"22222222-2222-2222-2222-222222222222","eventInfo":{{}}}}"#
        );
        WebhookEvent::from_slice(body.as_bytes()).unwrap()
    }

    /// Records handler invocations in order.
    #[derive(Default, Clone)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn recorder(&self, name: &'static str) -> impl Fn(&WebhookEvent) -> HandlerResult + Send + Sync + 'static {
            let journal = self.0.clone();
            move |_event| {
                journal.lock().push(name.to_string());
                Ok(())
            }
        }

        fn failing(&self, name: &'static str, cause: &'static str) -> impl Fn(&WebhookEvent) -> HandlerResult + Send + Sync + 'static {
            let journal = self.0.clone();
            move |_event| {
                journal.lock().push(name.to_string());
                Err(cause.into())
            }
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().clone()
        }
    }

    mod registration {
        use super::*;

        #[test]
        fn counts_per_event_type() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "a", journal.recorder("a"));
            registry.register_fn(WebhookEventType::StopListUpdate, "b", journal.recorder("b"));
            registry.register_fn(WebhookEventType::DeliveryOrderUpdate, "c", journal.recorder("c"));

            assert_eq!(registry.handler_count(&WebhookEventType::StopListUpdate), 2);
            assert_eq!(registry.handler_count(&WebhookEventType::DeliveryOrderUpdate), 1);
            assert!(!registry.is_registered(&WebhookEventType::DeliveryOrderError));
            assert!(journal.entries().is_empty());
        }

        #[test]
        fn duplicate_names_are_kept() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "same", journal.recorder("first"));
            registry.register_fn(WebhookEventType::StopListUpdate, "same", journal.recorder("second"));

            assert_eq!(
                registry.handler_names(&WebhookEventType::StopListUpdate),
                vec!["same".to_string(), "same".to_string()]
            );

            tokio_test::block_on(registry.dispatch(&event("StopListUpdate"), "")).unwrap();
            assert_eq!(journal.entries(), vec!["first", "second"]);
        }

        #[test]
        fn known_type_spelled_as_other_is_normalized() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(
                WebhookEventType::Other("StopListUpdate".to_string()),
                "h1",
                journal.recorder("h1"),
            );

            assert_eq!(registry.handler_count(&WebhookEventType::StopListUpdate), 1);
            tokio_test::block_on(registry.dispatch(&event("StopListUpdate"), "")).unwrap();
            assert_eq!(journal.entries(), vec!["h1"]);
        }

        #[test]
        fn secret_check_is_exact() {
            let registry = HandlerRegistry::with_secret("00123");
            assert!(registry.accepts_secret("00123"));
            assert!(!registry.accepts_secret("123"));
            assert!(!registry.accepts_secret(""));
            assert!(HandlerRegistry::new().accepts_secret("anything"));
        }

        #[test]
        fn debug_redacts_secret() {
            let registry = HandlerRegistry::with_secret(SECRET);
            let rendered = format!("{registry:?}");
            assert!(!rendered.contains(SECRET));
            assert!(rendered.contains("requires_secret: true"));
        }
    }

    mod dispatch {
        use super::*;

        #[tokio::test]
        async fn runs_handlers_in_registration_order() {
            let registry = HandlerRegistry::with_secret(SECRET);
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", journal.recorder("h1"));
            registry.register_fn(WebhookEventType::StopListUpdate, "h2", journal.recorder("h2"));
            registry.register_fn(WebhookEventType::StopListUpdate, "h3", journal.recorder("h3"));

            registry.dispatch(&event("StopListUpdate"), SECRET).await.unwrap();
            assert_eq!(journal.entries(), vec!["h1", "h2", "h3"]);
        }

        #[tokio::test]
        async fn first_failure_stops_the_rest() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", journal.recorder("h1"));
            registry.register_fn(WebhookEventType::StopListUpdate, "h2", journal.failing("h2", "boom"));
            registry.register_fn(WebhookEventType::StopListUpdate, "h3", journal.recorder("h3"));

            let err = registry.dispatch(&event("StopListUpdate"), "").await.unwrap_err();

            assert_eq!(journal.entries(), vec!["h1", "h2"]);
            match err {
                DispatchError::HandlerFailed {
                    ref handler,
                    ref event_type,
                    ..
                } => {
                    assert_eq!(handler, "h2");
                    assert_eq!(event_type, &WebhookEventType::StopListUpdate);
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(err.source().expect("cause").to_string(), "boom");
        }

        #[tokio::test]
        async fn unknown_type_is_no_handlers() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", journal.recorder("h1"));

            let err = registry.dispatch(&event("DeliveryOrderError"), "").await.unwrap_err();
            assert_eq!(err.kind(), DispatchErrorKind::NoHandlersRegistered);
            assert!(journal.entries().is_empty());
        }

        #[tokio::test]
        async fn other_event_types_are_routable() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(
                WebhookEventType::Other("ReserveUpdate".to_string()),
                "reserve",
                journal.recorder("reserve"),
            );

            registry.dispatch(&event("ReserveUpdate"), "").await.unwrap();
            assert_eq!(journal.entries(), vec!["reserve"]);
        }

        #[tokio::test]
        async fn wrong_secret_runs_nothing() {
            let registry = HandlerRegistry::with_secret(SECRET);
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", journal.recorder("h1"));

            let err = registry.dispatch(&event("StopListUpdate"), "guess").await.unwrap_err();
            assert_eq!(err.kind(), DispatchErrorKind::Unauthorized);
            assert!(journal.entries().is_empty());
        }

        #[tokio::test]
        async fn wrong_secret_wins_over_missing_handlers() {
            let registry = HandlerRegistry::with_secret(SECRET);
            let err = registry.dispatch(&event("StopListUpdate"), "").await.unwrap_err();
            assert_eq!(err.kind(), DispatchErrorKind::Unauthorized);
        }

        #[tokio::test]
        async fn empty_secret_accepts_anything() {
            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", journal.recorder("h1"));

            registry.dispatch(&event("StopListUpdate"), "whatever").await.unwrap();
            registry.dispatch(&event("StopListUpdate"), "").await.unwrap();
            assert_eq!(journal.entries(), vec!["h1", "h1"]);
        }

        #[tokio::test]
        async fn handlers_receive_the_event() {
            let registry = HandlerRegistry::new();
            let seen = Arc::new(Mutex::new(None));
            let sink = seen.clone();
            registry.register_fn(WebhookEventType::StopListUpdate, "h1", move |event: &WebhookEvent| {
                *sink.lock() = Some(event.event_time().to_vendor_format());
                Ok(())
            });

            registry.dispatch(&event("StopListUpdate"), "").await.unwrap();
            assert_eq!(seen.lock().as_deref(), Some("2024-01-02 10:00:00.123"));
        }

        #[tokio::test]
        async fn async_handlers_are_awaited() {
            struct Slow(Journal);

            #[async_trait::async_trait]
            impl WebhookHandler for Slow {
                async fn handle(&self, _event: &WebhookEvent) -> HandlerResult {
                    tokio::task::yield_now().await;
                    self.0.0.lock().push("slow".to_string());
                    Ok(())
                }
            }

            let registry = HandlerRegistry::new();
            let journal = Journal::default();
            registry.register(WebhookEventType::StopListUpdate, "slow", Slow(journal.clone()));
            registry.register_fn(WebhookEventType::StopListUpdate, "fast", journal.recorder("fast"));

            registry.dispatch(&event("StopListUpdate"), "").await.unwrap();
            assert_eq!(journal.entries(), vec!["slow", "fast"]);
        }

        #[tokio::test]
        async fn registration_during_dispatch_does_not_affect_it() {
            let registry = Arc::new(HandlerRegistry::new());
            let journal = Journal::default();
            let late = journal.clone();
            let inner = Arc::downgrade(&registry);
            registry.register_fn(WebhookEventType::StopListUpdate, "adder", move |_event: &WebhookEvent| {
                if let Some(registry) = inner.upgrade() {
                    registry.register_fn(WebhookEventType::StopListUpdate, "late", late.recorder("late"));
                }
                Ok(())
            });

            registry.dispatch(&event("StopListUpdate"), "").await.unwrap();
            assert!(journal.entries().is_empty());
            assert_eq!(registry.handler_count(&WebhookEventType::StopListUpdate), 2);
        }
    }
}
