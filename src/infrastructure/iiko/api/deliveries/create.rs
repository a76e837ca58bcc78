//! Request shapes for `/api/1/deliveries/create`.

use super::common::{
    DeliveryCustomer, DeliveryDiscount, DeliveryExternalData, DeliveryLoyaltyInfo,
    DeliveryOrderPoint, Guests,
};
use super::order::DeliveryOrderInfo;
use crate::domain::value_objects::{
    CorrelationId, EventTime, OrderServiceType, OrganizationId, PaymentTypeKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Creates a delivery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCreateRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Terminal group that will handle the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_group_id: Option<Uuid>,
    /// Creation settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_order_settings: Option<CreateOrderSettings>,
    /// The order.
    pub order: CreateDeliveryOrder,
}

/// Creation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderSettings {
    /// Seconds to wait for the POS to accept the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_to_front_timeout: Option<u32>,
    /// Reject the order if an item is on the stop list.
    #[serde(default)]
    pub check_stop_list: bool,
}

/// Order to create.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryOrder {
    /// External menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,
    /// Price category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_category_id: Option<String>,
    /// Order ID chosen by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// External number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_number: Option<String>,
    /// Promised delivery time; `None` means as soon as possible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_before: Option<EventTime>,
    /// Guest phone.
    pub phone: String,
    /// Phone extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_extension: Option<String>,
    /// Order type. Mutually exclusive with `order_service_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type_id: Option<Uuid>,
    /// Service type. Mutually exclusive with `order_type_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_service_type: Option<OrderServiceType>,
    /// Delivery point; required for courier delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_point: Option<DeliveryOrderPoint>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<DeliveryCustomer>,
    /// Guest count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<Guests>,
    /// Marketing source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_source_id: Option<Uuid>,
    /// Operator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<Uuid>,
    /// Delivery duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_duration: Option<u32>,
    /// Delivery zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_zone: Option<String>,
    /// Items.
    pub items: Vec<CreateOrderItem>,
    /// Combos.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub combos: Vec<CreateOrderCombo>,
    /// Payments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<CreateOrderPayment>,
    /// Tips.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<CreateOrderTip>,
    /// Source key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    /// Discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounts_info: Option<DiscountsInfo>,
    /// Loyalty parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_info: Option<DeliveryLoyaltyInfo>,
    /// Receipt options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cheque_additional_info: Option<ChequeAdditionalInfo>,
    /// Integration data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_data: Vec<DeliveryExternalData>,
}

impl CreateDeliveryOrder {
    /// Returns the sum of all payments.
    #[must_use]
    pub fn payments_total(&self) -> Decimal {
        self.payments.iter().map(|p| p.sum).sum()
    }
}

/// Order line to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    /// `Product` or `Compound`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Product.
    pub product_id: Uuid,
    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Unit price; `None` uses the menu price.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    /// Size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_size_id: Option<Uuid>,
    /// Combo membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo_information: Option<ComboInformation>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateOrderItem {
    /// Creates a product line.
    #[must_use]
    pub fn product(product_id: Uuid, amount: Decimal) -> Self {
        Self {
            kind: "Product".to_string(),
            product_id,
            amount,
            price: None,
            product_size_id: None,
            combo_information: None,
            comment: None,
        }
    }
}

/// Combo membership of a line to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboInformation {
    /// Combo ID.
    pub combo_id: Uuid,
    /// Combo source ID.
    pub combo_source_id: Uuid,
    /// Combo group ID.
    pub combo_group_id: Uuid,
}

/// Combo to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderCombo {
    /// Combo ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Quantity.
    pub amount: u32,
    /// Price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Combo source ID.
    pub source_id: Uuid,
    /// Loyalty program that produced the combo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<Uuid>,
    /// Size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_id: Option<Uuid>,
}

/// Extra payment data, e.g. a loyalty card credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAdditionalData {
    /// Data type.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Payment to attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayment {
    /// Payment kind.
    pub payment_type_kind: PaymentTypeKind,
    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
    /// Payment type.
    pub payment_type_id: Uuid,
    /// Processed outside the POS.
    #[serde(default)]
    pub is_processed_externally: bool,
    /// Extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_additional_data: Option<PaymentAdditionalData>,
    /// Fiscalized outside the POS.
    #[serde(default)]
    pub is_fiscalized_externally: bool,
    /// Prepayment.
    #[serde(default)]
    pub is_prepay: bool,
}

/// Tip to attach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderTip {
    /// Payment kind.
    pub payment_type_kind: PaymentTypeKind,
    /// Tips type.
    pub tips_type_id: Uuid,
    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
    /// Payment type.
    pub payment_type_id: Uuid,
    /// Processed outside the POS.
    #[serde(default)]
    pub is_processed_externally: bool,
    /// Extra data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_additional_data: Option<PaymentAdditionalData>,
    /// Fiscalized outside the POS.
    #[serde(default)]
    pub is_fiscalized_externally: bool,
    /// Prepayment.
    #[serde(default)]
    pub is_prepay: bool,
}

/// Loyalty card credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyCard {
    /// Card track.
    pub track: String,
}

/// Discounts to apply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountsInfo {
    /// Loyalty card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<LoyaltyCard>,
    /// Discounts.
    #[serde(default)]
    pub discounts: Vec<DeliveryDiscount>,
    /// Keep loyalty discounts fixed instead of recalculating them.
    #[serde(default)]
    pub fixed_loyalty_discounts: bool,
}

/// Receipt options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChequeAdditionalInfo {
    /// Print a receipt.
    pub need_receipt: bool,
    /// Email for the electronic receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Settlement place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_place: Option<String>,
    /// Phone for the electronic receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Accepted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCreateResponse {
    /// Operation ID.
    pub correlation_id: CorrelationId,
    /// Order as registered; usually still `InProgress`.
    pub order_info: DeliveryOrderInfo,
}
