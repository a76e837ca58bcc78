//! Webhook subscription settings.
//!
//! - `/api/1/webhooks/settings`
//! - `/api/1/webhooks/update_settings`

use crate::domain::value_objects::{CorrelationId, OrganizationId};
use crate::infrastructure::iiko::client::{IikoClient, RequestOptions};
use crate::infrastructure::iiko::error::IikoResult;
use serde::{Deserialize, Serialize};

/// Request for the current webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSettingsRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
}

/// Delivery order notifications filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOrderFilter {
    /// Order statuses to notify about.
    #[serde(default)]
    pub order_statuses: Vec<String>,
    /// Item statuses to notify about.
    #[serde(default)]
    pub item_statuses: Vec<String>,
    /// Notify about order errors.
    #[serde(default)]
    pub errors: bool,
    /// External data keys to include in notifications.
    #[serde(default)]
    pub returned_external_data_keys: Vec<String>,
}

/// Table order notifications filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOrderFilter {
    /// Order statuses to notify about.
    #[serde(default)]
    pub order_statuses: Vec<String>,
    /// Item statuses to notify about.
    #[serde(default)]
    pub item_statuses: Vec<String>,
    /// Notify about order errors.
    #[serde(default)]
    pub errors: bool,
}

/// Reserve notifications filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReserveFilter {
    /// Notify about updates.
    #[serde(default)]
    pub updates: bool,
    /// Notify about errors.
    #[serde(default)]
    pub errors: bool,
}

/// Filter that only toggles update notifications.
///
/// Used for stop lists, personal shifts, nomenclature and business hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdatesFilter {
    /// Notify about updates.
    #[serde(default)]
    pub updates: bool,
}

/// Which notifications the platform sends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebHooksFilter {
    /// Delivery orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_order_filter: Option<DeliveryOrderFilter>,
    /// Table orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_order_filter: Option<TableOrderFilter>,
    /// Reserves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_filter: Option<ReserveFilter>,
    /// Stop lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_list_update_filter: Option<UpdatesFilter>,
    /// Personal shifts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_shift_filter: Option<UpdatesFilter>,
    /// Nomenclature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomenclature_update_filter: Option<UpdatesFilter>,
    /// Business hours and mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_hours_and_mapping_update_filter: Option<UpdatesFilter>,
}

/// Current webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSettingsResponse {
    /// Operation ID.
    pub correlation_id: CorrelationId,
    /// Name of the API login the settings belong to.
    #[serde(default)]
    pub api_login_name: String,
    /// Target URI for notifications.
    #[serde(default)]
    pub web_hooks_uri: String,
    /// Secret the platform sends with every notification.
    #[serde(default)]
    pub auth_token: String,
    /// Enabled notifications.
    #[serde(default)]
    pub web_hooks_filter: WebHooksFilter,
}

/// New webhook settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdateSettingsRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Target URI for notifications.
    pub web_hooks_uri: String,
    /// Secret the platform will send with every notification.
    pub auth_token: String,
    /// Enabled notifications.
    pub web_hooks_filter: WebHooksFilter,
}

/// Response of a settings update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookUpdateSettingsResponse {
    /// Operation ID.
    pub correlation_id: CorrelationId,
}

impl IikoClient {
    /// Retrieves the webhook settings of an organization.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn webhook_settings(
        &self,
        request: &WebhookSettingsRequest,
        options: &RequestOptions,
    ) -> IikoResult<WebhookSettingsResponse> {
        self.post("/api/1/webhooks/settings", request, options).await
    }

    /// Replaces the webhook settings of an organization.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn update_webhook_settings(
        &self,
        request: &WebhookUpdateSettingsRequest,
        options: &RequestOptions,
    ) -> IikoResult<WebhookUpdateSettingsResponse> {
        self.post("/api/1/webhooks/update_settings", request, options)
            .await
    }
}
