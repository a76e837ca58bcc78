//! # Domain Layer
//!
//! Webhook envelope, vendor value objects and enumerations. No I/O.

pub mod events;
pub mod value_objects;
