//! # Application Layer
//!
//! Webhook dispatch use cases and their error types.

pub mod error;
pub mod webhooks;

pub use error::{DispatchError, DispatchErrorKind, DispatchResult, HandlerError, HandlerResult};
