//! # Dispatch Errors
//!
//! Error types for webhook ingestion and dispatch.
//!
//! # Error Hierarchy
//!
//! ```text
//! DispatchError
//! ├── MalformedTimestamp     - eventTime matched no supported encoding
//! ├── MalformedPayload       - body is not a webhook envelope
//! ├── Unauthorized           - supplied secret did not match
//! ├── NoHandlersRegistered   - nothing registered for the event type
//! └── HandlerFailed          - a named handler returned an error
//! ```
//!
//! # Examples
//!
//! ```
//! use iiko_client::application::error::{DispatchError, DispatchErrorKind};
//! use iiko_client::domain::events::WebhookEventType;
//!
//! let err = DispatchError::handler_failed("h1", WebhookEventType::StopListUpdate, "boom");
//! assert_eq!(err.kind(), DispatchErrorKind::HandlerFailed);
//! assert_eq!(err.status_code(), 500);
//! ```

use crate::domain::events::WebhookEventType;
use crate::domain::events::webhook_event::EnvelopeError;
use crate::domain::value_objects::event_time::ParseEventTimeError;
use std::fmt;
use thiserror::Error;

/// Error returned by a webhook handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by a webhook handler.
pub type HandlerResult = Result<(), HandlerError>;

/// Discriminator for [`DispatchError`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchErrorKind {
    /// See [`DispatchError::MalformedTimestamp`].
    MalformedTimestamp,
    /// See [`DispatchError::MalformedPayload`].
    MalformedPayload,
    /// See [`DispatchError::Unauthorized`].
    Unauthorized,
    /// See [`DispatchError::NoHandlersRegistered`].
    NoHandlersRegistered,
    /// See [`DispatchError::HandlerFailed`].
    HandlerFailed,
}

impl fmt::Display for DispatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTimestamp => write!(f, "MALFORMED_TIMESTAMP"),
            Self::MalformedPayload => write!(f, "MALFORMED_PAYLOAD"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::NoHandlersRegistered => write!(f, "NO_HANDLERS_REGISTERED"),
            Self::HandlerFailed => write!(f, "HANDLER_FAILED"),
        }
    }
}

/// Failure while ingesting or dispatching a webhook event.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// `eventTime` matched neither supported encoding.
    #[error("malformed timestamp: '{raw}'")]
    MalformedTimestamp {
        /// The offending text.
        raw: String,
    },

    /// The inbound bytes did not decode into the envelope shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// The supplied secret did not match the configured one.
    #[error("unauthorized")]
    Unauthorized,

    /// No handler is registered for the event type.
    #[error("no handlers registered for event type: {event_type}")]
    NoHandlersRegistered {
        /// The unmatched event type.
        event_type: WebhookEventType,
    },

    /// A handler failed; later handlers for the event were not run.
    #[error("handler '{handler}' failed for event type {event_type}: {source}")]
    HandlerFailed {
        /// Name the handler was registered under.
        handler: String,
        /// Event type being dispatched.
        event_type: WebhookEventType,
        /// Error returned by the handler.
        #[source]
        source: HandlerError,
    },
}

impl DispatchError {
    /// Creates a no-handlers error.
    #[must_use]
    pub fn no_handlers(event_type: WebhookEventType) -> Self {
        Self::NoHandlersRegistered { event_type }
    }

    /// Creates a handler failure.
    #[must_use]
    pub fn handler_failed(
        handler: impl Into<String>,
        event_type: WebhookEventType,
        source: impl Into<HandlerError>,
    ) -> Self {
        Self::HandlerFailed {
            handler: handler.into(),
            event_type,
            source: source.into(),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> DispatchErrorKind {
        match self {
            Self::MalformedTimestamp { .. } => DispatchErrorKind::MalformedTimestamp,
            Self::MalformedPayload(_) => DispatchErrorKind::MalformedPayload,
            Self::Unauthorized => DispatchErrorKind::Unauthorized,
            Self::NoHandlersRegistered { .. } => DispatchErrorKind::NoHandlersRegistered,
            Self::HandlerFailed { .. } => DispatchErrorKind::HandlerFailed,
        }
    }

    /// Returns true if the request itself was bad (the sender should not retry).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedTimestamp { .. } | Self::MalformedPayload(_) | Self::Unauthorized
        )
    }

    /// Returns the HTTP status an ingress endpoint should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::MalformedTimestamp { .. } | Self::MalformedPayload(_) => 400,
            Self::NoHandlersRegistered { .. } | Self::HandlerFailed { .. } => 500,
        }
    }

    /// Returns the failing handler name, if any.
    #[must_use]
    pub fn handler(&self) -> Option<&str> {
        match self {
            Self::HandlerFailed { handler, .. } => Some(handler.as_str()),
            _ => None,
        }
    }
}

impl From<ParseEventTimeError> for DispatchError {
    fn from(err: ParseEventTimeError) -> Self {
        Self::MalformedTimestamp { raw: err.raw }
    }
}

impl From<EnvelopeError> for DispatchError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Payload(source) => Self::MalformedPayload(source),
            EnvelopeError::Timestamp(source) => source.into(),
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
