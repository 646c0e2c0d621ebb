//! Tab snapshot - computed state from the event stream
//!
//! The snapshot includes a `state_checksum` field for drift detection.
//! Clients can compare their locally computed checksum with the server's
//! to detect if the replay logic has diverged.

use super::types::{Discount, LineItem, OrderBatch, SettlementGroup, TableRef, Tip};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Tab status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabStatus {
    #[default]
    Open,
    /// "Bring the check" - closed for ordering, awaiting whole-tab payment
    ClosedPending,
    /// Split configured, awaiting settlement payments
    SplitPending,
    Paid,
    Cancelled,
}

impl TabStatus {
    /// Terminal statuses admit no further mutation
    pub fn is_terminal(&self) -> bool {
        matches!(self, TabStatus::Paid | TabStatus::Cancelled)
    }
}

/// One entry of the tab's status-change history (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub status: TabStatus,
    pub actor_id: String,
    pub actor_name: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Tab snapshot - computed from the event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabSnapshot {
    /// Tab ID (assigned by server)
    pub tab_id: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Store the tab belongs to
    pub store_id: String,
    /// Shift active when the tab was opened
    pub shift_id: String,
    /// Per-tenant monotonic folio
    pub folio: u64,
    /// Printable receipt number derived from the folio
    pub receipt_number: String,
    /// Tables held by this tab (released on terminal status)
    pub tables: Vec<TableRef>,
    /// Assigned server/waiter
    pub server_id: String,
    pub server_name: String,
    /// Guest count
    pub guest_count: i32,
    /// Free-text note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Tab status
    pub status: TabStatus,
    /// Append-only list of order batches
    pub orders: Vec<OrderBatch>,
    /// Tab-level discount (None = no discount)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
    /// Tab-level tip
    #[serde(default)]
    pub tip: Tip,
    /// Subtotal over non-cancelled items
    pub subtotal: f64,
    /// Total = subtotal - discount + tip (always recomputed, never set directly)
    pub total: f64,
    /// Whether a split has been configured (gates whole-tab payment)
    #[serde(default)]
    pub is_split: bool,
    /// Settlement groups when split
    #[serde(default)]
    pub settlements: Vec<SettlementGroup>,
    /// Finalized sales produced from this tab (one if unsplit, one per group)
    #[serde(default)]
    pub sale_ids: Vec<String>,
    /// Ordered status-change history (append-only, never edited)
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    /// Tab open time
    pub opened_at: i64,
    /// Terminal time (paid or cancelled)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    /// Creation timestamp
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence - the optimistic revision counter
    pub last_sequence: u64,
    /// State checksum for drift detection (hex string).
    /// Computed from item count, total cents, status and last_sequence.
    #[serde(default)]
    pub state_checksum: String,
}

impl TabSnapshot {
    /// Create a new empty tab
    pub fn new(tab_id: String) -> Self {
        let now = crate::util::now_millis();
        let mut snapshot = Self {
            tab_id,
            tenant_id: String::new(),
            store_id: String::new(),
            shift_id: String::new(),
            folio: 0,
            receipt_number: String::new(),
            tables: Vec::new(),
            server_id: String::new(),
            server_name: String::new(),
            guest_count: 1,
            note: None,
            status: TabStatus::Open,
            orders: Vec::new(),
            discount: None,
            tip: Tip::default(),
            subtotal: 0.0,
            total: 0.0,
            is_split: false,
            settlements: Vec::new(),
            sale_ids: Vec::new(),
            status_history: Vec::new(),
            opened_at: now,
            closed_at: None,
            created_at: now,
            updated_at: now,
            last_sequence: 0,
            state_checksum: String::new(),
        };
        snapshot.update_checksum();
        snapshot
    }

    /// Whether the tab still occupies its tables
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Iterate all line items with their (order_idx, item_idx) coordinates
    pub fn indexed_items(&self) -> impl Iterator<Item = (u32, u32, &LineItem)> {
        self.orders.iter().enumerate().flat_map(|(oi, batch)| {
            batch
                .items
                .iter()
                .enumerate()
                .map(move |(ii, item)| (oi as u32, ii as u32, item))
        })
    }

    /// Item at the given coordinates, if any
    pub fn item_at(&self, order_idx: u32, item_idx: u32) -> Option<&LineItem> {
        self.orders
            .get(order_idx as usize)
            .and_then(|batch| batch.items.get(item_idx as usize))
    }

    /// Number of line items across all batches
    pub fn item_count(&self) -> usize {
        self.orders.iter().map(|b| b.items.len()).sum()
    }

    /// All settlement groups paid?
    pub fn all_settlements_paid(&self) -> bool {
        !self.settlements.is_empty()
            && self
                .settlements
                .iter()
                .all(|g| g.status == super::types::SettlementStatus::Paid)
    }

    /// Append a status-history entry
    pub fn push_status_change(
        &mut self,
        status: TabStatus,
        actor_id: &str,
        actor_name: &str,
        timestamp: i64,
        reason: Option<String>,
    ) {
        self.status_history.push(StatusChange {
            status,
            actor_id: actor_id.to_string(),
            actor_name: actor_name.to_string(),
            timestamp,
            reason,
        });
    }

    /// Compute state checksum for drift detection
    ///
    /// Fields included:
    /// - item count across batches
    /// - total in cents (avoids float precision issues)
    /// - last applied event sequence
    /// - status discriminant
    /// Returns a 16-character hex string.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();
        self.item_count().hash(&mut hasher);
        ((self.total * 100.0).round() as i64).hash(&mut hasher);
        self.last_sequence.hash(&mut hasher);
        (self.status as u8).hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Update the state_checksum field based on current state
    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    /// Verify that the stored checksum matches the computed one.
    /// Returns false if drift is detected.
    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}

impl Default for TabSnapshot {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::types::{ItemStatus, OrderBatch};

    fn item(name: &str, price: f64, qty: i32) -> LineItem {
        LineItem {
            product_id: format!("prod-{name}"),
            name: name.to_string(),
            category_name: None,
            unit_price: price,
            quantity: qty,
            note: None,
            status: ItemStatus::Pending,
            status_log: vec![],
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!TabStatus::Open.is_terminal());
        assert!(!TabStatus::ClosedPending.is_terminal());
        assert!(!TabStatus::SplitPending.is_terminal());
        assert!(TabStatus::Paid.is_terminal());
        assert!(TabStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_indexed_items_coordinates() {
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.orders.push(OrderBatch {
            ordered_at: 1,
            items: vec![item("a", 10.0, 1), item("b", 5.0, 2)],
        });
        snapshot.orders.push(OrderBatch {
            ordered_at: 2,
            items: vec![item("c", 3.0, 1)],
        });

        let coords: Vec<(u32, u32)> = snapshot
            .indexed_items()
            .map(|(oi, ii, _)| (oi, ii))
            .collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (1, 0)]);
        assert_eq!(snapshot.item_count(), 3);
        assert_eq!(snapshot.item_at(1, 0).unwrap().name, "c");
        assert!(snapshot.item_at(2, 0).is_none());
    }

    #[test]
    fn test_checksum_changes_with_state() {
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        let initial = snapshot.state_checksum.clone();
        snapshot.total = 42.0;
        snapshot.last_sequence = 1;
        snapshot.update_checksum();
        assert_ne!(snapshot.state_checksum, initial);
        assert!(snapshot.verify_checksum());
    }
}
