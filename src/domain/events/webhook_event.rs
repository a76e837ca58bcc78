//! # Webhook Event Envelope
//!
//! The generic envelope iiko wraps around every webhook notification.
//!
//! The envelope carries routing metadata only. The event-specific body
//! (`eventInfo`) is kept as raw JSON text so that each handler can decode it
//! into the shape it expects.
//!
//! # Examples
//!
//! ```
//! use iiko_client::domain::events::webhook_event::{WebhookEvent, WebhookEventType};
//!
//! let body = br#"{
//!     "eventType": "StopListUpdate",
//!     "eventTime": "2024-01-02 10:00:00.123",
//!     "organizationId": "11111111-1111-1111-1111-111111111111",
//!     "correlationId": "22222222-2222-2222-2222-222222222222",
//!     "eventInfo": {}
//! }"#;
//!
//! let event = WebhookEvent::from_slice(body).unwrap();
//! assert_eq!(event.event_type(), &WebhookEventType::StopListUpdate);
//! assert_eq!(event.event_info_raw(), "{}");
//! ```

use crate::domain::value_objects::event_time::{EventTime, ParseEventTimeError};
use crate::domain::value_objects::ids::{CorrelationId, OrganizationId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;
use thiserror::Error;

/// Kind of webhook notification, keyed by the vendor string.
///
/// Types this crate does not know about are preserved in
/// [`WebhookEventType::Other`] so new vendor events can be routed without a
/// code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEventType {
    /// Stop list (items out of stock) changed for one or more terminal groups.
    StopListUpdate,
    /// A delivery order was created or changed.
    DeliveryOrderUpdate,
    /// Asynchronous delivery order creation failed.
    DeliveryOrderError,
    /// Any other vendor event type.
    Other(String),
}

impl WebhookEventType {
    /// Returns the vendor spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::StopListUpdate => "StopListUpdate",
            Self::DeliveryOrderUpdate => "DeliveryOrderUpdate",
            Self::DeliveryOrderError => "DeliveryOrderError",
            Self::Other(name) => name,
        }
    }

    /// Returns true if this is one of the event types the crate knows.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for WebhookEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for WebhookEventType {
    fn from(value: &str) -> Self {
        match value {
            "StopListUpdate" => Self::StopListUpdate,
            "DeliveryOrderUpdate" => Self::DeliveryOrderUpdate,
            "DeliveryOrderError" => Self::DeliveryOrderError,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WebhookEventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "StopListUpdate" | "DeliveryOrderUpdate" | "DeliveryOrderError" => {
                Self::from(value.as_str())
            }
            _ => Self::Other(value),
        }
    }
}

impl From<WebhookEventType> for String {
    fn from(value: WebhookEventType) -> Self {
        match value {
            WebhookEventType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Failure to decode a webhook envelope.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The bytes are not a JSON object of the envelope shape.
    #[error("malformed webhook payload: {0}")]
    Payload(#[source] serde_json::Error),

    /// The envelope decoded but `eventTime` matched no supported encoding.
    #[error(transparent)]
    Timestamp(#[from] ParseEventTimeError),
}

/// One inbound webhook notification.
///
/// Immutable once decoded. The `eventInfo` body is never inspected by the
/// envelope; use [`WebhookEvent::decode_info`] to read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawEnvelope")]
pub struct WebhookEvent {
    event_type: WebhookEventType,
    event_time: EventTime,
    organization_id: OrganizationId,
    correlation_id: CorrelationId,
    event_info: Box<RawValue>,
}

/// Wire form of the envelope with the timestamp still as text.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    event_type: WebhookEventType,
    #[serde(default)]
    event_time: Option<String>,
    organization_id: OrganizationId,
    correlation_id: CorrelationId,
    #[serde(default = "null_info")]
    event_info: Box<RawValue>,
}

fn null_info() -> Box<RawValue> {
    RawValue::NULL.to_owned()
}

impl TryFrom<RawEnvelope> for WebhookEvent {
    type Error = ParseEventTimeError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let event_time = match raw.event_time.as_deref() {
            Some(text) => EventTime::parse(text)?,
            None => EventTime::ZERO,
        };

        Ok(Self {
            event_type: raw.event_type,
            event_time,
            organization_id: raw.organization_id,
            correlation_id: raw.correlation_id,
            event_info: raw.event_info,
        })
    }
}

impl WebhookEvent {
    /// Builds an event from parts.
    #[must_use]
    pub fn new(
        event_type: WebhookEventType,
        event_time: EventTime,
        organization_id: OrganizationId,
        correlation_id: CorrelationId,
        event_info: Box<RawValue>,
    ) -> Self {
        Self {
            event_type,
            event_time,
            organization_id,
            correlation_id,
            event_info,
        }
    }

    /// Decodes an envelope from raw request bytes.
    ///
    /// A bad `eventTime` is reported separately from any other shape problem.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Payload`] if the bytes do not match the
    /// envelope shape, or [`EnvelopeError::Timestamp`] if only the timestamp
    /// is unreadable.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let raw: RawEnvelope = serde_json::from_slice(bytes).map_err(EnvelopeError::Payload)?;
        Ok(Self::try_from(raw)?)
    }

    /// Returns the event type.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &WebhookEventType {
        &self.event_type
    }

    /// Returns when the vendor recorded the event.
    #[inline]
    #[must_use]
    pub fn event_time(&self) -> EventTime {
        self.event_time
    }

    /// Returns the organization the event belongs to.
    #[inline]
    #[must_use]
    pub fn organization_id(&self) -> OrganizationId {
        self.organization_id
    }

    /// Returns the vendor correlation id.
    #[inline]
    #[must_use]
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Returns the undecoded `eventInfo` JSON text.
    #[inline]
    #[must_use]
    pub fn event_info_raw(&self) -> &str {
        self.event_info.get()
    }

    /// Decodes `eventInfo` into a caller-chosen shape.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body does not match `T`.
    pub fn decode_info<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(self.event_info.get())
    }
}
