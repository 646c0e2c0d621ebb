//! Core traits and context for command processing
//!
//! - [`CommandHandler`] - validates a command and emits events
//! - [`EventApplier`] - folds one event into a snapshot (pure)
//! - [`CommandContext`] - transaction-scoped view used by actions: staged
//!   snapshots, staged sales, sequence allocation, and the in-transaction
//!   lookups (table occupancy, folio, active shift)

use async_trait::async_trait;
use shared::models::{Sale, Shift};
use shared::tab::types::CommandErrorCode;
use shared::tab::{TabEvent, TabSnapshot};
use std::collections::HashMap;

use super::storage::{StorageError, TabStorage};

/// Errors raised while executing a command action
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Tab already paid: {0}")]
    TabAlreadyPaid(String),

    #[error("Tab already cancelled: {0}")]
    TabAlreadyCancelled(String),

    #[error("Item not found: order {order_idx}, item {item_idx}")]
    ItemNotFound { order_idx: u32, item_idx: u32 },

    #[error("Settlement group not found: {0}")]
    SettlementNotFound(u32),

    #[error("Table is already occupied: {0}")]
    TableOccupied(String),

    #[error("No active shift for store: {0}")]
    NoActiveShift(String),

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for TabError {
    fn from(err: StorageError) -> Self {
        TabError::Storage(err.to_string())
    }
}

/// Metadata extracted from the command envelope
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub tenant_id: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Client timestamp (audit only; server timestamps are authoritative)
    pub timestamp: i64,
}

/// Transaction-scoped context handed to command actions.
///
/// Everything read or written through the context lives inside one redb
/// write transaction, so check-and-set sequences (table occupancy, folio
/// allocation) are atomic with the event commit.
pub struct CommandContext<'a> {
    txn: &'a redb::WriteTransaction,
    storage: &'a TabStorage,
    /// Last allocated sequence number
    sequence: u64,
    /// Snapshots staged for write (copy-on-write view of the aggregate)
    snapshots: HashMap<String, TabSnapshot>,
    /// Sales staged for insert in the same commit
    sales: Vec<Sale>,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        txn: &'a redb::WriteTransaction,
        storage: &'a TabStorage,
        current_sequence: u64,
    ) -> Self {
        Self {
            txn,
            storage,
            sequence: current_sequence,
            snapshots: HashMap::new(),
            sales: Vec::new(),
        }
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Last allocated sequence (persisted by the manager at commit)
    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }

    /// Load a snapshot - staged copy first, then storage
    pub fn load_snapshot(&self, tab_id: &str) -> Result<TabSnapshot, TabError> {
        if let Some(snapshot) = self.snapshots.get(tab_id) {
            return Ok(snapshot.clone());
        }
        self.storage
            .get_snapshot_txn(self.txn, tab_id)?
            .ok_or_else(|| TabError::TabNotFound(tab_id.to_string()))
    }

    /// Stage a snapshot for persistence at commit
    pub fn save_snapshot(&mut self, snapshot: TabSnapshot) {
        self.snapshots.insert(snapshot.tab_id.clone(), snapshot);
    }

    /// Staged snapshots (consumed by the manager)
    pub fn take_snapshots(&mut self) -> Vec<TabSnapshot> {
        self.snapshots.drain().map(|(_, s)| s).collect()
    }

    /// Stage a finalized sale for insertion in the same commit
    pub fn stage_sale(&mut self, sale: Sale) {
        self.sales.push(sale);
    }

    /// Staged sales (consumed by the manager)
    pub fn take_sales(&mut self) -> Vec<Sale> {
        std::mem::take(&mut self.sales)
    }

    /// Check-and-set lookup: the active tab occupying a table, if any
    pub fn find_active_tab_for_table(
        &self,
        tenant_id: &str,
        table_id: &str,
    ) -> Result<Option<String>, TabError> {
        Ok(self
            .storage
            .find_active_tab_for_table_txn(self.txn, tenant_id, table_id)?)
    }

    /// Allocate the next folio for a tenant (atomic with the commit)
    pub fn next_folio(&self, tenant_id: &str) -> Result<u64, TabError> {
        Ok(self.storage.next_folio(self.txn, tenant_id)?)
    }

    /// The open shift for a store, if any
    pub fn active_shift(
        &self,
        tenant_id: &str,
        store_id: &str,
    ) -> Result<Option<Shift>, TabError> {
        Ok(self.storage.active_shift_txn(self.txn, tenant_id, store_id)?)
    }
}

/// Command handler - validates and produces events, never mutates state
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError>;
}

/// Event applier - pure fold of one event into the snapshot
#[enum_dispatch::enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent);
}
