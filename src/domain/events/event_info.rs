//! # Event Info Shapes
//!
//! Typed bodies for webhook `eventInfo` payloads whose layout does not depend
//! on any API DTO. Delivery order events reuse
//! [`DeliveryOrderInfo`](crate::infrastructure::iiko::api::deliveries::DeliveryOrderInfo).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of a `StopListUpdate` event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopListUpdateInfo {
    /// Terminal groups whose stop lists changed.
    #[serde(default)]
    pub terminal_groups_stop_lists_updates: Vec<TerminalGroupStopListUpdate>,
}

/// Stop list change for a single terminal group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalGroupStopListUpdate {
    /// Terminal group ID.
    pub id: Uuid,
    /// True if the full stop list must be re-read, false for a partial change.
    pub is_full: bool,
}

impl StopListUpdateInfo {
    /// Returns the terminal groups that need a full stop list reload.
    pub fn full_reloads(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.terminal_groups_stop_lists_updates
            .iter()
            .filter(|update| update.is_full)
            .map(|update| update.id)
    }
}
