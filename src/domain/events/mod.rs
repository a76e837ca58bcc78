//! # Webhook Events
//!
//! Inbound notifications pushed by the iiko platform.
//!
//! - [`WebhookEvent`]: generic envelope with routing metadata
//! - [`WebhookEventType`]: event kind keyed by the vendor string
//! - [`StopListUpdateInfo`]: typed body of `StopListUpdate`

pub mod event_info;
pub mod webhook_event;

pub use event_info::{StopListUpdateInfo, TerminalGroupStopListUpdate};
pub use webhook_event::{EnvelopeError, WebhookEvent, WebhookEventType};
