//! # Value Objects
//!
//! Immutable types with vendor wire semantics.
//!
//! - [`EventTime`]: vendor timestamp with two textual encodings
//! - [`OrganizationId`], [`CorrelationId`]: UUID-based identifiers
//! - Vendor enums such as [`DeliveryStatus`] and [`WalletType`]

pub mod enums;
pub mod event_time;
pub mod ids;

pub use enums::{
    ConsentStatus, DeliveryItemStatus, DeliveryStatus, OrderCreationStatus, OrderServiceType,
    ParseEnumError, PaymentTypeKind, SexType, WalletType,
};
pub use event_time::{EventTime, ParseEventTimeError};
pub use ids::{CorrelationId, OrganizationId};
