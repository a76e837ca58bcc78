//! Delivery orders as reported by the platform.
//!
//! [`DeliveryOrderInfo`] is returned by `/api/1/deliveries/by_id` and
//! `/api/1/deliveries/create`, and is also the `eventInfo` body of
//! `DeliveryOrderUpdate` and `DeliveryOrderError` webhooks.

use super::common::{
    DeliveryCustomer, DeliveryDiscount, DeliveryExternalData, DeliveryLoyaltyInfo,
    DeliveryOrderPoint, Guests, NamedRef,
};
use crate::domain::events::WebhookEvent;
use crate::domain::value_objects::{
    DeliveryItemStatus, DeliveryStatus, EventTime, OrderCreationStatus, OrderServiceType,
    OrganizationId, PaymentTypeKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Order with its creation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderInfo {
    /// Order ID.
    pub id: Uuid,
    /// POS order ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_id: Option<Uuid>,
    /// External number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_number: Option<String>,
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Server-side revision of the latest change.
    #[serde(default)]
    pub timestamp: i64,
    /// Creation status.
    pub creation_status: OrderCreationStatus,
    /// Set when creation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
    /// Order details; absent while creation is in progress or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<DeliveryOrder>,
}

impl DeliveryOrderInfo {
    /// Decodes the `eventInfo` of a delivery order webhook.
    ///
    /// # Errors
    ///
    /// Returns the decode error if the body is not an order.
    pub fn from_event(event: &WebhookEvent) -> Result<Self, serde_json::Error> {
        event.decode_info()
    }

    /// Returns true if creation failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.creation_status == OrderCreationStatus::Error
    }

    /// Returns the delivery status, if the order details are present.
    #[must_use]
    pub fn status(&self) -> Option<DeliveryStatus> {
        self.order.as_ref().map(|order| order.status)
    }
}

/// Why order creation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    /// Error code.
    pub code: String,
    /// Message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Code-specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<Value>,
}

/// Delivery order details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrder {
    /// Parent delivery, for split orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_delivery_id: Option<Uuid>,
    /// Guest.
    #[serde(default)]
    pub customer: DeliveryCustomer,
    /// Guest phone.
    #[serde(default)]
    pub phone: String,
    /// Phone extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_extension: Option<String>,
    /// Delivery point; absent for pickup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_point: Option<DeliveryOrderPoint>,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// Set for cancelled orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_info: Option<DeliveryCancelInfo>,
    /// Assigned courier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier_info: Option<DeliveryCourierInfo>,
    /// Promised delivery time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_before: Option<EventTime>,
    /// Created.
    #[serde(default)]
    pub when_created: EventTime,
    /// Confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_confirmed: Option<EventTime>,
    /// Service printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_printed: Option<EventTime>,
    /// Cooking completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_cooking_completed: Option<EventTime>,
    /// Handed to the courier. The vendor spells it this way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_sended: Option<EventTime>,
    /// Delivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_delivered: Option<EventTime>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Reported problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<DeliveryProblem>,
    /// Operator who took the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<DeliveryPerson>,
    /// Marketing source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing_source: Option<NamedRef>,
    /// Delivery duration in minutes.
    #[serde(default)]
    pub delivery_duration: u32,
    /// Position in the courier route.
    #[serde(default)]
    pub index_in_courier_route: Option<u32>,
    /// Cooking start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_start_time: Option<EventTime>,
    /// Deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Received through the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_received_by_api: Option<EventTime>,
    /// Received from the POS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_received_from_front: Option<EventTime>,
    /// Source delivery of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_from_delivery_id: Option<Uuid>,
    /// Source terminal group of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_from_terminal_group_id: Option<Uuid>,
    /// Source organization of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_from_organization_id: Option<Uuid>,
    /// External courier service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_courier_service: Option<NamedRef>,
    /// Target delivery of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_delivery_id: Option<Uuid>,
    /// Target terminal group of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_terminal_group_id: Option<Uuid>,
    /// Target organization of a move.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved_to_organization_id: Option<Uuid>,
    /// External menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,
    /// Delivery zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_zone: Option<String>,
    /// Locked for editing since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<EventTime>,
    /// Estimated delivery time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<EventTime>,
    /// As soon as possible.
    #[serde(default)]
    pub is_asap: bool,
    /// Packed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_packed: Option<EventTime>,
    /// Price category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_category: Option<NamedRef>,
    /// Order total.
    #[serde(with = "rust_decimal::serde::float", default)]
    pub sum: Decimal,
    /// Order number.
    #[serde(default)]
    pub number: u64,
    /// Source key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_key: Option<String>,
    /// Bill printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_bill_printed: Option<EventTime>,
    /// Closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_closed: Option<EventTime>,
    /// Concept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conception: Option<Conception>,
    /// Guests.
    #[serde(default)]
    pub guests_info: Guests,
    /// Items.
    #[serde(default)]
    pub items: Vec<DeliveryItem>,
    /// Combos.
    #[serde(default)]
    pub combos: Vec<DeliveryCombo>,
    /// Payments.
    #[serde(default)]
    pub payments: Vec<DeliveryPayment>,
    /// Tips.
    #[serde(default)]
    pub tips: Vec<DeliveryTip>,
    /// Discounts and surcharges.
    #[serde(default)]
    pub discounts: Vec<DeliveryDiscount>,
    /// Order type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type: Option<DeliveryOrderType>,
    /// Terminal group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_group_id: Option<Uuid>,
    /// Sum of processed payments.
    #[serde(with = "rust_decimal::serde::float", default)]
    pub processed_payments_sum: Decimal,
    /// Loyalty parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loyalty_info: Option<DeliveryLoyaltyInfo>,
    /// Integration data.
    #[serde(default)]
    pub external_data: Vec<DeliveryExternalData>,
}

impl DeliveryOrder {
    /// Returns the amount still to be paid.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        (self.sum - self.processed_payments_sum).max(Decimal::ZERO)
    }
}

/// Cancellation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCancelInfo {
    /// Cancelled.
    #[serde(default)]
    pub when_cancelled: EventTime,
    /// Cause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<NamedRef>,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Courier assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCourierInfo {
    /// Courier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<DeliveryPerson>,
    /// Chosen by hand rather than automatically.
    #[serde(default)]
    pub is_courier_selected_manually: bool,
}

/// Employee reference with phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPerson {
    /// Employee ID.
    pub id: Uuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Problem flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryProblem {
    /// Whether a problem is set.
    pub has_problem: bool,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Restaurant concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conception {
    /// Concept ID.
    pub id: Uuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Code.
    #[serde(default)]
    pub code: String,
}

/// Order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItem {
    /// `Product` or `Compound`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Cooking status.
    pub status: DeliveryItemStatus,
    /// Set when the line was removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<DeliveryItemDeleted>,
    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_printed: Option<EventTime>,
    /// Size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NamedRef>,
    /// Combo membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo_information: Option<DeliveryComboInformation>,
}

/// Removal of an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryItemDeleted {
    /// How it was removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_method: Option<DeliveryDeletionMethod>,
}

/// Removal method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDeletionMethod {
    /// Method ID.
    pub id: String,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Removal type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removal_type: Option<NamedRef>,
}

/// Combo membership of an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryComboInformation {
    /// Combo ID.
    pub combo_id: Uuid,
    /// Combo source ID.
    pub combo_source_id: Uuid,
    /// Group ID.
    pub group_id: Uuid,
    /// Group name.
    #[serde(default)]
    pub group_name: String,
}

/// Combo in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryCombo {
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
    /// Size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<NamedRef>,
}

/// Payment type reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPaymentType {
    /// Payment type ID.
    pub id: Uuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Kind.
    pub kind: PaymentTypeKind,
}

/// Payment component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayment {
    /// Payment type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<DeliveryPaymentType>,
    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
    /// Preliminary.
    #[serde(default)]
    pub is_preliminary: bool,
    /// Added through the API.
    #[serde(default)]
    pub is_external: bool,
    /// Processed outside the POS.
    #[serde(default)]
    pub is_processed_externally: bool,
    /// Fiscalized outside the POS.
    #[serde(default)]
    pub is_fiscalized_externally: bool,
    /// Prepayment.
    #[serde(default)]
    pub is_prepay: bool,
}

/// Tip component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTip {
    /// Tips type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips_type: Option<NamedRef>,
    /// Payment type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<DeliveryPaymentType>,
    /// Amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub sum: Decimal,
    /// Preliminary.
    #[serde(default)]
    pub is_preliminary: bool,
    /// Added through the API.
    #[serde(default)]
    pub is_external: bool,
    /// Processed outside the POS.
    #[serde(default)]
    pub is_processed_externally: bool,
    /// Fiscalized outside the POS.
    #[serde(default)]
    pub is_fiscalized_externally: bool,
    /// Prepayment.
    #[serde(default)]
    pub is_prepay: bool,
}

/// Order type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderType {
    /// Order type ID.
    pub id: Uuid,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Service type.
    pub order_service_type: OrderServiceType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_json() -> Value {
        json!({
            "id": "33333333-3333-3333-3333-333333333333",
            "posId": null,
            "externalNumber": "A-17",
            "organizationId": "11111111-1111-1111-1111-111111111111",
            "timestamp": 1704189600123_i64,
            "creationStatus": "Success",
            "errorInfo": null,
            "order": {
                "customer": {"type": "regular", "id": "44444444-4444-4444-4444-444444444444", "name": "Ivan"},
                "phone": "+79990000000",
                "status": "OnWay",
                "whenCreated": "2024-01-02 10:00:00.123",
                "whenSended": "2024-01-02 10:35:00.000",
                "completeBefore": "2024-01-02 11:00:00.000",
                "sum": 1250.5,
                "number": 17,
                "processedPaymentsSum": 250,
                "guestsInfo": {"count": 2, "splitBetweenPersons": false},
                "items": [{
                    "type": "Product",
                    "status": "CookingComplete",
                    "amount": 1.5,
                    "size": null
                }],
                "payments": [{
                    "paymentType": {"id": "55555555-5555-5555-5555-555555555555", "name": "Cash", "kind": "Cash"},
                    "sum": 250,
                    "isPreliminary": true
                }],
                "orderType": {
                    "id": "66666666-6666-6666-6666-666666666666",
                    "name": "Delivery",
                    "orderServiceType": "DeliveryByCourier"
                }
            }
        })
    }

    #[test]
    fn decodes_order_info() {
        let info: DeliveryOrderInfo = serde_json::from_value(order_json()).unwrap();
        assert_eq!(info.status(), Some(DeliveryStatus::OnWay));
        assert!(!info.is_failed());

        let order = info.order.unwrap();
        assert_eq!(order.when_created.to_vendor_format(), "2024-01-02 10:00:00.123");
        assert_eq!(order.items[0].amount, Decimal::new(15, 1));
        assert_eq!(order.outstanding(), Decimal::new(10005, 1));
        assert_eq!(
            order.order_type.unwrap().order_service_type,
            OrderServiceType::DeliveryByCourier
        );
    }

    #[test]
    fn failed_creation_has_no_order() {
        let info: DeliveryOrderInfo = serde_json::from_value(json!({
            "id": "33333333-3333-3333-3333-333333333333",
            "organizationId": "11111111-1111-1111-1111-111111111111",
            "timestamp": 1,
            "creationStatus": "Error",
            "errorInfo": {"code": "TerminalGroupDisabled", "message": "Terminal group is disabled"},
            "order": null
        }))
        .unwrap();

        assert!(info.is_failed());
        assert_eq!(info.status(), None);
        assert_eq!(info.error_info.unwrap().code, "TerminalGroupDisabled");
    }

    #[test]
    fn decodes_from_webhook_event() {
        let envelope = json!({
            "eventType": "DeliveryOrderUpdate",
            "eventTime": "2024-01-02 10:35:00.000",
            "organizationId": "11111111-1111-1111-1111-111111111111",
            "correlationId": "22222222-2222-2222-2222-222222222222",
            "eventInfo": order_json()
        });
        let event = WebhookEvent::from_slice(envelope.to_string().as_bytes()).unwrap();
        let info = DeliveryOrderInfo::from_event(&event).unwrap();
        assert_eq!(info.external_number.as_deref(), Some("A-17"));
    }
}
