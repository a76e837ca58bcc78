//! Loyalty programs (`/api/1/loyalty/iiko/program`) and wallet balances.

use crate::domain::value_objects::{EventTime, OrganizationId, WalletType};
use crate::infrastructure::iiko::client::{IikoClient, RequestOptions};
use crate::infrastructure::iiko::error::IikoResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request for the loyalty programs of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProgramsRequest {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Leave marketing campaigns out of the response.
    #[serde(default)]
    pub without_marketing_campaigns: bool,
}

/// Loyalty programs of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProgramsResponse {
    /// Programs. The API capitalizes this key.
    #[serde(rename = "Programs", default)]
    pub programs: Vec<Program>,
}

/// Loyalty program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Program ID.
    pub id: Uuid,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Start of the service period.
    #[serde(default)]
    pub service_from: EventTime,
    /// End of the service period.
    #[serde(default)]
    pub service_to: Option<EventTime>,
    /// Notify guests about balance changes.
    #[serde(default)]
    pub notify_about_balance_changes: bool,
    /// Vendor program type code.
    #[serde(default)]
    pub program_type: i32,
    /// Whether the program is active.
    #[serde(default)]
    pub is_active: bool,
    /// Wallet the program credits.
    #[serde(default)]
    pub wallet_id: Option<Uuid>,
    /// Marketing campaigns.
    #[serde(default)]
    pub marketing_campaigns: Vec<MarketingCampaign>,
    /// Organizations the program applies to.
    #[serde(default)]
    pub applied_organizations: Vec<Uuid>,
    /// Vendor template type code.
    #[serde(default)]
    pub template_type: i32,
    /// Whether an exchange rate is used.
    #[serde(default)]
    pub is_exchange_rate_enabled: bool,
    /// Vendor refill type code.
    #[serde(default)]
    pub refill_type: i32,
}

/// Marketing campaign of a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketingCampaign {
    /// Campaign ID.
    pub id: Uuid,
    /// Owning program.
    pub program_id: Uuid,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the campaign is active.
    #[serde(default)]
    pub is_active: bool,
    /// Start of the campaign.
    #[serde(default)]
    pub period_from: EventTime,
    /// End of the campaign.
    #[serde(default)]
    pub period_to: Option<EventTime>,
    /// Bindings evaluated per order.
    #[serde(default)]
    pub order_action_condition_bindings: Vec<ActionConditionBinding>,
    /// Bindings evaluated periodically.
    #[serde(default)]
    pub periodic_action_condition_bindings: Vec<ActionConditionBinding>,
    /// Bindings evaluated on overdraft.
    #[serde(default)]
    pub overdraft_action_condition_bindings: Vec<ActionConditionBinding>,
    /// Bindings evaluated on guest registration.
    #[serde(default)]
    pub guest_registration_action_condition_bindings: Vec<ActionConditionBinding>,
}

/// Actions guarded by conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConditionBinding {
    /// Binding ID.
    pub id: Uuid,
    /// Stop evaluating later bindings once this one fires.
    #[serde(default)]
    pub stop_further_execution: bool,
    /// Actions.
    #[serde(default)]
    pub actions: Vec<RuleElement>,
    /// Conditions.
    #[serde(default)]
    pub conditions: Vec<RuleElement>,
}

/// Action or condition. Settings are an opaque JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleElement {
    /// Element ID.
    pub id: Uuid,
    /// Settings, JSON encoded.
    #[serde(default)]
    pub settings: String,
    /// Vendor type name.
    #[serde(default)]
    pub type_name: String,
    /// Checksum.
    #[serde(default)]
    pub check_sum: String,
}

/// Balance of one customer wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// Wallet ID.
    pub id: String,
    /// Wallet name.
    pub name: String,
    /// Wallet type.
    #[serde(rename = "type")]
    pub wallet_type: WalletType,
    /// Balance.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Program {
    /// Returns true if the program is active and has started by `at`.
    #[must_use]
    pub fn is_running_at(&self, at: EventTime) -> bool {
        self.is_active
            && self.service_from <= at
            && self.service_to.is_none_or(|to| to.is_zero() || at <= to)
    }
}

impl IikoClient {
    /// Lists the loyalty programs of an organization.
    ///
    /// # Errors
    ///
    /// Returns any [`IikoError`](crate::infrastructure::iiko::IikoError) of the call.
    pub async fn loyalty_programs(
        &self,
        request: &GetProgramsRequest,
        options: &RequestOptions,
    ) -> IikoResult<GetProgramsResponse> {
        self.post("/api/1/loyalty/iiko/program", request, options)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn programs_key_is_capitalized() {
        let body = json!({
            "Programs": [{
                "id": "55555555-5555-5555-5555-555555555555",
                "name": "Bonus",
                "description": null,
                "serviceFrom": "2024-01-01 00:00:00.000",
                "serviceTo": null,
                "notifyAboutBalanceChanges": true,
                "programType": 0,
                "isActive": true,
                "walletId": "66666666-6666-6666-6666-666666666666",
                "marketingCampaigns": [],
                "appliedOrganizations": ["11111111-1111-1111-1111-111111111111"],
                "templateType": 0,
                "isExchangeRateEnabled": false,
                "refillType": 0
            }]
        });
        let response: GetProgramsResponse = serde_json::from_value(body).unwrap();
        let program = &response.programs[0];
        assert_eq!(program.name, "Bonus");
        assert!(program.is_running_at(EventTime::parse("2024-06-01 12:00:00").unwrap()));
        assert!(!program.is_running_at(EventTime::parse("2023-12-31 23:59:59").unwrap()));
    }

    #[test]
    fn wallet_balance_decodes_number() {
        let balance: WalletBalance = serde_json::from_value(json!({
            "id": "w1",
            "name": "Bonuses",
            "type": 1,
            "balance": 150.5
        }))
        .unwrap();
        assert_eq!(balance.wallet_type, WalletType::BonusProgram);
        assert_eq!(balance.balance, Decimal::new(1505, 1));
    }

    #[test]
    fn wallet_balance_encodes_number() {
        let balance = WalletBalance {
            id: "w1".to_string(),
            name: "Bonuses".to_string(),
            wallet_type: WalletType::CertificateProgram,
            balance: Decimal::from(20),
        };
        let value = serde_json::to_value(&balance).unwrap();
        assert_eq!(value["type"], 4);
        assert_eq!(value["balance"], 20.0);
    }
}
