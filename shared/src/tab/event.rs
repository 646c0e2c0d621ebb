//! Tab events - immutable facts recorded after command processing

use super::types::{
    AdjustmentKind, ItemStatus, LineItem, PaymentPart, PaymentType, SettlementGroup, TableRef,
    TipKind,
};
use serde::{Deserialize, Serialize};

/// Tab event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    /// This is the AUTHORITATIVE ordering mechanism for state evolution
    pub sequence: u64,
    /// Tab this event belongs to
    pub tab_id: String,
    /// Server timestamp (Unix milliseconds) - AUTHORITATIVE for state evolution
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds) - for audit and debugging.
    /// Preserved from the original command, may differ due to clock skew.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Operator who triggered this event
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: TabEventType,
    /// Event payload
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabEventType {
    // Lifecycle
    TabOpened,
    TabClosed,
    TabPaid,
    TabCancelled,

    // Items
    OrderAdded,
    ItemStatusChanged,

    // Adjustments
    DiscountApplied,
    TipApplied,

    // Split
    SplitConfigured,
    SettlementPaid,
}

impl std::fmt::Display for TabEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabEventType::TabOpened => write!(f, "TAB_OPENED"),
            TabEventType::TabClosed => write!(f, "TAB_CLOSED"),
            TabEventType::TabPaid => write!(f, "TAB_PAID"),
            TabEventType::TabCancelled => write!(f, "TAB_CANCELLED"),
            TabEventType::OrderAdded => write!(f, "ORDER_ADDED"),
            TabEventType::ItemStatusChanged => write!(f, "ITEM_STATUS_CHANGED"),
            TabEventType::DiscountApplied => write!(f, "DISCOUNT_APPLIED"),
            TabEventType::TipApplied => write!(f, "TIP_APPLIED"),
            TabEventType::SplitConfigured => write!(f, "SPLIT_CONFIGURED"),
            TabEventType::SettlementPaid => write!(f, "SETTLEMENT_PAID"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Lifecycle ==========
    TabOpened {
        tenant_id: String,
        store_id: String,
        shift_id: String,
        /// Per-tenant folio allocated inside the opening transaction
        folio: u64,
        /// Printable receipt number derived from the folio
        receipt_number: String,
        tables: Vec<TableRef>,
        server_id: String,
        server_name: String,
        guest_count: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },

    TabClosed {},

    TabPaid {
        sale_id: String,
        payment_type: PaymentType,
        payments: Vec<PaymentPart>,
        final_total: f64,
    },

    TabCancelled {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    // ========== Items ==========
    OrderAdded {
        /// Index the new batch takes in the snapshot
        order_idx: u32,
        ordered_at: i64,
        /// Complete snapshots of the added items (price captured)
        items: Vec<LineItem>,
    },

    ItemStatusChanged {
        order_idx: u32,
        item_idx: u32,
        from: ItemStatus,
        to: ItemStatus,
    },

    // ========== Adjustments ==========
    DiscountApplied {
        kind: AdjustmentKind,
        value: f64,
        /// Computed currency amount at application time
        amount: f64,
    },

    TipApplied {
        kind: TipKind,
        value: f64,
        amount: f64,
    },

    // ========== Split ==========
    SplitConfigured {
        groups: Vec<SettlementGroup>,
    },

    SettlementPaid {
        group_index: u32,
        sale_id: String,
        payment_type: PaymentType,
        payments: Vec<PaymentPart>,
        total: f64,
    },
}

impl TabEvent {
    /// Create a new event
    ///
    /// # Arguments
    /// * `sequence` - Global sequence number (authoritative ordering)
    /// * `tab_id` - Tab this event belongs to
    /// * `operator_id` / `operator_name` - Operator audit snapshot
    /// * `command_id` - Command that triggered this event
    /// * `client_timestamp` - Client-provided timestamp (may have clock skew)
    /// * `event_type` / `payload` - Event content
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        tab_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: TabEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            tab_id,
            // Server timestamp is ALWAYS set by the server - authoritative
            timestamp: crate::util::now_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }

    /// Create event from command metadata (preserves client timestamp)
    pub fn from_command(
        sequence: u64,
        tab_id: String,
        command: &super::TabCommand,
        event_type: TabEventType,
        payload: EventPayload,
    ) -> Self {
        Self::new(
            sequence,
            tab_id,
            command.operator_id.clone(),
            command.operator_name.clone(),
            command.command_id.clone(),
            Some(command.timestamp),
            event_type,
            payload,
        )
    }
}
