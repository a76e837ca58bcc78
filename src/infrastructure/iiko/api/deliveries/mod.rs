//! # Deliveries
//!
//! - `/api/1/deliveries/create`
//! - `/api/1/deliveries/by_id`
//! - `/api/1/deliveries/update_order_delivery_status`
//!
//! Order creation and order lookup use different shapes for the same
//! concepts; creation types live in [`create`], reported orders in [`order`].

pub mod common;
pub mod create;
pub mod order;

pub use common::{
    DeliveryAddress, DeliveryCoordinates, DeliveryCustomer, DeliveryDiscount,
    DeliveryExternalData, DeliveryLoyaltyInfo, DeliveryOrderPoint, Guests, NamedRef,
};
pub use create::{
    ChequeAdditionalInfo, ComboInformation, CreateDeliveryOrder, CreateOrderCombo,
    CreateOrderItem, CreateOrderPayment, CreateOrderSettings, CreateOrderTip,
    DeliveryCreateRequest, DeliveryCreateResponse, DiscountsInfo, LoyaltyCard,
    PaymentAdditionalData,
};
pub use order::{DeliveryOrder, DeliveryOrderInfo, ErrorInfo};

use crate::domain::value_objects::{CorrelationId, DeliveryStatus, EventTime, OrganizationId};
use crate::infrastructure::iiko::client::{IikoClient, RequestOptions};
use crate::infrastructure::iiko::error::{IikoError, IikoResult};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Most orders `/api/1/deliveries/by_id` accepts per call.
pub const MAX_ORDERS_PER_LOOKUP: usize = 200;

/// Sets the delivery status of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderDeliveryStatusRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Order ID.
    pub order_id: Uuid,
    /// When the status changed.
    pub delivery_date: EventTime,
    /// New status.
    pub status: DeliveryStatus,
}

/// Response of a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderDeliveryStatusResponse {
    /// Operation ID.
    pub correlation_id: CorrelationId,
}

/// Looks orders up by order ID or POS order ID.
///
/// Exactly one of `order_ids` and `pos_order_ids` must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveriesByIdRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Order IDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_ids: Vec<Uuid>,
    /// Source keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_keys: Vec<String>,
    /// POS order IDs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pos_order_ids: Vec<Uuid>,
    /// External data keys to return.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub return_external_data_keys: Vec<String>,
    /// Report whether an employee holds the order lock.
    #[serde(default)]
    pub return_locked_by_user: bool,
}

impl DeliveriesByIdRequest {
    /// Creates a lookup by order IDs.
    #[must_use]
    pub fn by_order_ids(organization_id: OrganizationId, order_ids: Vec<Uuid>) -> Self {
        Self {
            organization_id,
            order_ids,
            ..Self::default()
        }
    }

    /// Creates a lookup by POS order IDs.
    #[must_use]
    pub fn by_pos_order_ids(organization_id: OrganizationId, pos_order_ids: Vec<Uuid>) -> Self {
        Self {
            organization_id,
            pos_order_ids,
            ..Self::default()
        }
    }

    /// Checks the ID list rules before sending.
    ///
    /// # Errors
    ///
    /// Returns `IikoError::InvalidRequest` if both or neither ID lists are
    /// set, or a list exceeds [`MAX_ORDERS_PER_LOOKUP`].
    pub fn validate(&self) -> IikoResult<()> {
        match (self.order_ids.is_empty(), self.pos_order_ids.is_empty()) {
            (true, true) => Err(IikoError::invalid_request(
                "one of orderIds and posOrderIds is required",
            )),
            (false, false) => Err(IikoError::invalid_request(
                "orderIds and posOrderIds are mutually exclusive",
            )),
            _ if self.order_ids.len().max(self.pos_order_ids.len()) > MAX_ORDERS_PER_LOOKUP => {
                Err(IikoError::invalid_request(format!(
                    "at most {MAX_ORDERS_PER_LOOKUP} orders per lookup"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Orders found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveriesByIdResponse {
    /// Orders.
    #[serde(default)]
    pub orders: Vec<DeliveryOrderInfo>,
}

impl IikoClient {
    /// Creates a delivery order.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`] of the call.
    #[instrument(skip_all, fields(organization_id = %request.organization_id))]
    pub async fn create_delivery(
        &self,
        request: &DeliveryCreateRequest,
        options: &RequestOptions,
    ) -> IikoResult<DeliveryCreateResponse> {
        self.post("/api/1/deliveries/create", request, options)
            .await
    }

    /// Retrieves orders by ID.
    ///
    /// # Errors
    ///
    /// Returns `IikoError::InvalidRequest` if the request breaks the ID list
    /// rules, otherwise any [`IikoError`] of the call.
    #[instrument(skip_all, fields(organization_id = %request.organization_id))]
    pub async fn deliveries_by_id(
        &self,
        request: &DeliveriesByIdRequest,
        options: &RequestOptions,
    ) -> IikoResult<DeliveriesByIdResponse> {
        request.validate()?;
        self.post("/api/1/deliveries/by_id", request, options).await
    }

    /// Sets the delivery status of an order.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`] of the call.
    #[instrument(skip_all, fields(order_id = %request.order_id, status = %request.status))]
    pub async fn update_order_delivery_status(
        &self,
        request: &UpdateOrderDeliveryStatusRequest,
        options: &RequestOptions,
    ) -> IikoResult<UpdateOrderDeliveryStatusResponse> {
        self.post(
            "/api/1/deliveries/update_order_delivery_status",
            request,
            options,
        )
        .await
    }
}
