//! External menus and price categories (`/api/2/menu`).

use crate::domain::value_objects::CorrelationId;
use crate::infrastructure::iiko::client::{IikoClient, RequestOptions};
use crate::infrastructure::iiko::error::IikoResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// External menu reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMenu {
    /// Menu ID.
    pub id: String,
    /// Menu name.
    pub name: String,
}

/// Price category reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCategory {
    /// Category ID.
    pub id: String,
    /// Category name.
    pub name: String,
}

/// External menus available to the API login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    /// Operation ID.
    pub correlation_id: CorrelationId,
    /// External menus.
    #[serde(default)]
    pub external_menus: Vec<ExternalMenu>,
    /// Price categories.
    #[serde(default)]
    pub price_categories: Vec<PriceCategory>,
}

impl IikoClient {
    /// Lists external menus and price categories.
    ///
    /// The endpoint takes no parameters; an empty JSON object is sent.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn menu(&self, options: &RequestOptions) -> IikoResult<MenuResponse> {
        self.post("/api/2/menu", &Map::<String, Value>::new(), options)
            .await
    }
}
