//! Delivery types shared by order creation and order lookup.

use crate::domain::value_objects::EventTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Where the order goes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderPoint {
    /// Coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<DeliveryCoordinates>,
    /// Address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<DeliveryAddress>,
    /// ID in an external cartography system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_cartography_id: Option<String>,
    /// Comment for the courier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeliveryCoordinates {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

/// Delivery address.
///
/// Only the discriminator is modelled; the layout of the remaining fields
/// depends on it (`legacy` or `city`) and is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Address layout.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Remaining address fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Guest placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCustomer {
    /// `regular` for a known guest, `one-time` for an anonymous one.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Guest ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Comment about the guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Birth date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<EventTime>,
    /// Email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Gender: `NotSpecified`, `Male` or `Female`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Guest count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guests {
    /// Number of persons.
    pub count: u32,
    /// Split the bill between persons.
    #[serde(default)]
    pub split_between_persons: bool,
}

/// Discount or surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryDiscount {
    /// Discount source, e.g. `RMS` or `iikoCard`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Remaining discount fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Loyalty parameters of an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLoyaltyInfo {
    /// Coupon code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    /// Manual conditions applied to the order.
    #[serde(default)]
    pub applicable_manual_conditions: Vec<Uuid>,
}

/// Integration key/value attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryExternalData {
    /// Key.
    pub key: String,
    /// Value.
    pub value: String,
    /// Visible in the POS.
    #[serde(default)]
    pub is_public: bool,
}

/// Identifier and name of a reference entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Entity ID.
    pub id: Uuid,
    /// Display name.
    #[serde(default)]
    pub name: String,
}
