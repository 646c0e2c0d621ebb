//! Tab commands - client requests to mutate a tab

use super::types::{
    AdjustmentKind, ItemStatus, OrderItemInput, SettlementGroupInput, TableRef, Tender, TipKind,
};
use serde::{Deserialize, Serialize};

/// Command envelope. The tenant/operator fields come from the resolved
/// auth context and are trusted as pre-validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabCommand {
    /// Client-generated unique ID (idempotency key)
    pub command_id: String,
    /// Acting tenant
    pub tenant_id: String,
    /// Operator who issued the command
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: TabCommandPayload,
}

impl TabCommand {
    pub fn new(
        tenant_id: impl Into<String>,
        operator_id: impl Into<String>,
        operator_name: impl Into<String>,
        payload: TabCommandPayload,
    ) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            tenant_id: tenant_id.into(),
            operator_id: operator_id.into(),
            operator_name: operator_name.into(),
            timestamp: crate::util::now_millis(),
            payload,
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabCommandPayload {
    /// Open a tab on one or more tables
    OpenTab {
        store_id: String,
        tables: Vec<TableRef>,
        server_id: String,
        server_name: String,
        guest_count: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    /// Append a batch of line items
    AddOrder {
        tab_id: String,
        items: Vec<OrderItemInput>,
    },

    /// Advance one item's kitchen status
    UpdateItemStatus {
        tab_id: String,
        order_idx: u32,
        item_idx: u32,
        status: ItemStatus,
    },

    /// Apply (or replace) the tab-level discount
    ApplyDiscount {
        tab_id: String,
        kind: AdjustmentKind,
        value: f64,
    },

    /// Apply (or replace) the tab-level tip
    ApplyTip {
        tab_id: String,
        kind: TipKind,
        value: f64,
    },

    /// "Bring the check": close for payment, no payment yet
    CloseTab { tab_id: String },

    /// Cancel from any non-terminal state
    CancelTab {
        tab_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Partition the tab's billable items into settlement groups
    ConfigureSplit {
        tab_id: String,
        groups: Vec<SettlementGroupInput>,
    },

    /// Pay the whole (unsplit) tab
    PayTab { tab_id: String, tender: Tender },

    /// Pay one settlement group of a split tab
    PaySettlement {
        tab_id: String,
        group_index: u32,
        tender: Tender,
    },
}
