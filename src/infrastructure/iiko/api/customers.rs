//! Loyalty customer management.
//!
//! - `/api/1/loyalty/iiko/customer/create_or_update`
//! - `/api/1/loyalty/iiko/delete_customers`
//! - `/api/1/loyalty/iiko/restore_customers`
//! - `/api/1/loyalty/iiko/customer_category` (plus `/add` and `/remove`)

use crate::domain::value_objects::{ConsentStatus, EventTime, OrganizationId, SexType};
use crate::infrastructure::iiko::client::{IikoClient, RequestOptions};
use crate::infrastructure::iiko::error::IikoResult;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

/// Creates a customer or updates the one matched by id, phone or card track.
///
/// Fields left as `None` are not sent and stay unchanged on update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrUpdateCustomerRequest {
    /// Customer ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Card track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_track: Option<String>,
    /// Card number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Middle name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Surname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sur_name: Option<String>,
    /// Birthday, vendor format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<EventTime>,
    /// Email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Sex.
    #[serde(default)]
    pub sex: SexType,
    /// Marketing consent.
    #[serde(default)]
    pub consent_status: ConsentStatus,
    /// Whether promo messages are wanted; `None` means unknown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_receive_promo_actions_info: Option<bool>,
    /// Referrer customer. `Uuid::nil()` removes the referrer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer_id: Option<Uuid>,
    /// Free-form integration data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    /// Organization ID.
    pub organization_id: OrganizationId,
}

/// Result of a create-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrUpdateCustomerResponse {
    /// Customer ID.
    pub id: Uuid,
}

/// Customers to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCustomersRequest {
    /// Customer IDs.
    pub customer_ids: Vec<Uuid>,
    /// Organization ID.
    pub organization_id: OrganizationId,
}

/// Outcome of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCustomersResponse {
    /// Customers processed.
    pub total: u32,
    /// Customers deleted.
    pub deleted: u32,
    /// Customers not found.
    pub not_found: u32,
}

/// Customers to restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreCustomersRequest {
    /// Customer IDs.
    pub customer_ids: Vec<Uuid>,
    /// Organization ID.
    pub organization_id: OrganizationId,
}

/// Outcome of a bulk restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreCustomersResponse {
    /// Customers processed.
    pub total: u32,
    /// Customers restored.
    pub restored: u32,
    /// Customers not found.
    pub not_found: u32,
}

/// Request for the guest categories of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCategoriesRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
}

/// Guest category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCategory {
    /// Category ID.
    pub id: Uuid,
    /// Category name.
    pub name: String,
    /// Whether the category is active.
    #[serde(default)]
    pub is_active: bool,
    /// Whether new guests get this category.
    #[serde(default)]
    pub is_default_for_new_guests: bool,
}

/// Guest categories of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCategoriesResponse {
    /// Categories.
    #[serde(default)]
    pub guest_categories: Vec<CustomerCategory>,
}

/// Assigns or removes one category for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCategoryChangeRequest {
    /// Customer ID.
    pub customer_id: Uuid,
    /// Category ID.
    pub category_id: Uuid,
    /// Organization ID.
    pub organization_id: OrganizationId,
}

impl IikoClient {
    /// Creates a customer or updates the matching one.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    #[instrument(skip_all, fields(organization_id = %request.organization_id))]
    pub async fn create_or_update_customer(
        &self,
        request: &CreateOrUpdateCustomerRequest,
        options: &RequestOptions,
    ) -> IikoResult<CreateOrUpdateCustomerResponse> {
        self.post("/api/1/loyalty/iiko/customer/create_or_update", request, options)
            .await
    }

    /// Deletes customers.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn delete_customers(
        &self,
        request: &DeleteCustomersRequest,
        options: &RequestOptions,
    ) -> IikoResult<DeleteCustomersResponse> {
        self.post("/api/1/loyalty/iiko/delete_customers", request, options)
            .await
    }

    /// Restores deleted customers.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn restore_customers(
        &self,
        request: &RestoreCustomersRequest,
        options: &RequestOptions,
    ) -> IikoResult<RestoreCustomersResponse> {
        self.post("/api/1/loyalty/iiko/restore_customers", request, options)
            .await
    }

    /// Lists guest categories.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn customer_categories(
        &self,
        request: &CustomerCategoriesRequest,
        options: &RequestOptions,
    ) -> IikoResult<CustomerCategoriesResponse> {
        self.post("/api/1/loyalty/iiko/customer_category", request, options)
            .await
    }

    /// Adds a category to a customer. The API answers with no body.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn add_customer_category(
        &self,
        request: &CustomerCategoryChangeRequest,
        options: &RequestOptions,
    ) -> IikoResult<()> {
        self.post_empty("/api/1/loyalty/iiko/customer_category/add", request, options)
            .await
    }

    /// Removes a category from a customer. The API answers with no body.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn remove_customer_category(
        &self,
        request: &CustomerCategoryChangeRequest,
        options: &RequestOptions,
    ) -> IikoResult<()> {
        self.post_empty("/api/1/loyalty/iiko/customer_category/remove", request, options)
            .await
    }
}
