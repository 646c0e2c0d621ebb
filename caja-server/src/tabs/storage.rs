//! redb-based storage layer for tab event sourcing and the finalized ledger
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(tab_id, sequence)` | `TabEvent` | Event stream (append-only) |
//! | `snapshots` | `tab_id` | `TabSnapshot` | Snapshot cache |
//! | `active_tabs` | `tab_id` | `()` | Active (non-terminal) tab index |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `sequence_counter` | `()` | `u64` | Global sequence |
//! | `folio_counters` | `tenant_id` | `u64` | Per-tenant folio allocation |
//! | `sales` | `sale_id` | `Sale` | Finalized payment records |
//! | `sales_by_time` | `(tenant_id, created_at, sale_id)` | `()` | Window-scan index |
//! | `refunds` | `refund_id` | `Refund` | Refund records |
//! | `refunds_by_sale` | `(sale_id, refund_id)` | `()` | Per-sale refund index |
//! | `expenses` | `expense_id` | `Expense` | Expense records |
//! | `expenses_by_time` | `(tenant_id, created_at, expense_id)` | `()` | Window-scan index |
//! | `shifts` | `shift_id` | `Shift` | Shift records |
//! | `active_shifts` | `(tenant_id, store_id)` | `shift_id` | One open shift per store |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate`: a commit is persistent as soon
//! as `commit()` returns, via copy-on-write with atomic pointer swap. The
//! database file is always in a consistent state, which matters for POS
//! terminals that lose power without warning.
//!
//! Folio allocation happens inside the caller's write transaction, so the
//! increment and the tab creation commit or fail together.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{Expense, Refund, Sale, Shift};
use shared::tab::{TabEvent, TabSnapshot};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Event stream: key = (tab_id, sequence), value = JSON-serialized TabEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");

/// Snapshots: key = tab_id, value = JSON-serialized TabSnapshot
const SNAPSHOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Active (non-terminal) tabs: key = tab_id, value = empty (existence check)
const ACTIVE_TABS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_tabs");

/// Processed commands: key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

/// Per-tenant folio counters: key = tenant_id, value = last allocated folio
const FOLIO_TABLE: TableDefinition<&str, u64> = TableDefinition::new("folio_counters");

/// Finalized sales: key = sale_id, value = JSON-serialized Sale
const SALES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("sales");

/// Sales window index: key = (tenant_id, created_at millis, sale_id)
const SALES_BY_TIME_TABLE: TableDefinition<(&str, i64, &str), ()> =
    TableDefinition::new("sales_by_time");

/// Refunds: key = refund_id, value = JSON-serialized Refund
const REFUNDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("refunds");

/// Per-sale refund index: key = (sale_id, refund_id)
const REFUNDS_BY_SALE_TABLE: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("refunds_by_sale");

/// Expenses: key = expense_id, value = JSON-serialized Expense
const EXPENSES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("expenses");

/// Expense window index: key = (tenant_id, created_at millis, expense_id)
const EXPENSES_BY_TIME_TABLE: TableDefinition<(&str, i64, i64), ()> =
    TableDefinition::new("expenses_by_time");

/// Shifts: key = shift_id, value = JSON-serialized Shift
const SHIFTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("shifts");

/// One open shift per (tenant, store): value = shift_id
const ACTIVE_SHIFTS_TABLE: TableDefinition<(&str, &str), &str> =
    TableDefinition::new("active_shifts");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Sale not found: {0}")]
    SaleNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Tab and ledger storage backed by redb
#[derive(Clone)]
pub struct TabStorage {
    db: Arc<Database>,
}

impl TabStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(SNAPSHOTS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_TABS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
            let _ = write_txn.open_table(FOLIO_TABLE)?;
            let _ = write_txn.open_table(SALES_TABLE)?;
            let _ = write_txn.open_table(SALES_BY_TIME_TABLE)?;
            let _ = write_txn.open_table(REFUNDS_TABLE)?;
            let _ = write_txn.open_table(REFUNDS_BY_SALE_TABLE)?;
            let _ = write_txn.open_table(EXPENSES_TABLE)?;
            let _ = write_txn.open_table(EXPENSES_BY_TIME_TABLE)?;
            let _ = write_txn.open_table(SHIFTS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_SHIFTS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Get the next sequence number (does NOT increment - use within transaction)
    pub fn get_next_sequence(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        Ok(current + 1)
    }

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    ///
    /// The manager calls this after events are generated so the counter
    /// lands in the same commit as the events themselves.
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Folio Allocation ==========

    /// Allocate the next folio for a tenant, within the caller's transaction.
    ///
    /// Monotonic and gap-free: the increment commits together with the tab
    /// that consumes it, or not at all.
    pub fn next_folio(&self, txn: &WriteTransaction, tenant_id: &str) -> StorageResult<u64> {
        let mut table = txn.open_table(FOLIO_TABLE)?;
        let current = table.get(tenant_id)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(tenant_id, next)?;
        Ok(next)
    }

    /// Last allocated folio for a tenant (read-only)
    pub fn current_folio(&self, tenant_id: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FOLIO_TABLE)?;
        Ok(table.get(tenant_id)?.map(|g| g.value()).unwrap_or(0))
    }

    // ========== Command Idempotency ==========

    /// Check if a command has been processed
    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check if a command has been processed (within transaction)
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Mark a command as processed
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event
    pub fn store_event(&self, txn: &WriteTransaction, event: &TabEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let key = (event.tab_id.as_str(), event.sequence);
        let value = serde_json::to_vec(event)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Get all events for a tab, ordered by sequence
    pub fn get_events_for_tab(&self, tab_id: &str) -> StorageResult<Vec<TabEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        let range_start = (tab_id, 0u64);
        let range_end = (tab_id, u64::MAX);

        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            let event: TabEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    // ========== Snapshot Operations ==========

    /// Store a snapshot
    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &TabSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SNAPSHOTS_TABLE)?;
        let value = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.tab_id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a snapshot by tab ID
    pub fn get_snapshot(&self, tab_id: &str) -> StorageResult<Option<TabSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SNAPSHOTS_TABLE)?;

        match table.get(tab_id)? {
            Some(value) => {
                let snapshot: TabSnapshot = serde_json::from_slice(value.value())?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Get a snapshot by tab ID (within transaction)
    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        tab_id: &str,
    ) -> StorageResult<Option<TabSnapshot>> {
        let table = txn.open_table(SNAPSHOTS_TABLE)?;

        match table.get(tab_id)? {
            Some(value) => {
                let snapshot: TabSnapshot = serde_json::from_slice(value.value())?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    // ========== Active Tabs ==========

    /// Mark a tab as active (occupying its tables)
    pub fn mark_tab_active(&self, txn: &WriteTransaction, tab_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_TABS_TABLE)?;
        table.insert(tab_id, ())?;
        Ok(())
    }

    /// Mark a tab as inactive (terminal - tables released)
    pub fn mark_tab_inactive(&self, txn: &WriteTransaction, tab_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_TABS_TABLE)?;
        table.remove(tab_id)?;
        Ok(())
    }

    /// Get all active tab IDs
    pub fn get_active_tab_ids(&self) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACTIVE_TABS_TABLE)?;

        let mut tab_ids: Vec<String> = Vec::new();
        for result in table.iter()? {
            let (key, _value) = result?;
            tab_ids.push(key.value().to_string());
        }

        Ok(tab_ids)
    }

    /// Get all active tab snapshots for a tenant
    pub fn get_active_tabs(&self, tenant_id: &str) -> StorageResult<Vec<TabSnapshot>> {
        let active_ids = self.get_active_tab_ids()?;
        let mut snapshots = Vec::new();

        for tab_id in active_ids {
            if let Some(snapshot) = self.get_snapshot(&tab_id)?
                && snapshot.tenant_id == tenant_id
            {
                snapshots.push(snapshot);
            }
        }

        Ok(snapshots)
    }

    /// Find the active tab occupying a table, within the write transaction.
    ///
    /// Scanning inside the transaction is what makes open-tab a true
    /// check-and-set: a concurrent open of the same table serializes behind
    /// this transaction and observes the winner.
    pub fn find_active_tab_for_table_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        table_id: &str,
    ) -> StorageResult<Option<String>> {
        let active_table = txn.open_table(ACTIVE_TABS_TABLE)?;
        let snapshots_table = txn.open_table(SNAPSHOTS_TABLE)?;

        for result in active_table.iter()? {
            let (key, _) = result?;
            let tab_id = key.value();

            if let Some(value) = snapshots_table.get(tab_id)? {
                let snapshot: TabSnapshot = serde_json::from_slice(value.value())?;
                if snapshot.tenant_id == tenant_id
                    && snapshot.tables.iter().any(|t| t.table_id == table_id)
                {
                    return Ok(Some(tab_id.to_string()));
                }
            }
        }

        Ok(None)
    }

    // ========== Sales ==========

    /// Insert a finalized sale and its window index (within transaction)
    pub fn store_sale(&self, txn: &WriteTransaction, sale: &Sale) -> StorageResult<()> {
        let mut table = txn.open_table(SALES_TABLE)?;
        let value = serde_json::to_vec(sale)?;
        table.insert(sale.sale_id.as_str(), value.as_slice())?;

        let mut index = txn.open_table(SALES_BY_TIME_TABLE)?;
        index.insert(
            (sale.tenant_id.as_str(), sale.created_at, sale.sale_id.as_str()),
            (),
        )?;
        Ok(())
    }

    /// Overwrite a sale record (refund bookkeeping / cancellation only).
    /// The creation-time index entry is left untouched so window attribution
    /// never moves.
    pub fn update_sale(&self, txn: &WriteTransaction, sale: &Sale) -> StorageResult<()> {
        let mut table = txn.open_table(SALES_TABLE)?;
        let value = serde_json::to_vec(sale)?;
        table.insert(sale.sale_id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get a sale by ID
    pub fn get_sale(&self, sale_id: &str) -> StorageResult<Option<Sale>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SALES_TABLE)?;
        match table.get(sale_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Scan sales for a tenant whose creation time falls in `[start, end)`.
    ///
    /// Completion time equals creation time at insert, so the creation-time
    /// index covers both selection timestamps.
    pub fn sales_in_window(
        &self,
        tenant_id: &str,
        start: i64,
        end: i64,
    ) -> StorageResult<Vec<Sale>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(SALES_BY_TIME_TABLE)?;
        let table = read_txn.open_table(SALES_TABLE)?;

        let mut sales = Vec::new();
        let range_start = (tenant_id, start, "");
        let range_end = (tenant_id, end, "");

        for result in index.range(range_start..range_end)? {
            let (key, _) = result?;
            let (_, _, sale_id) = key.value();
            match table.get(sale_id)? {
                Some(value) => sales.push(serde_json::from_slice(value.value())?),
                None => return Err(StorageError::SaleNotFound(sale_id.to_string())),
            }
        }

        Ok(sales)
    }

    // ========== Refunds ==========

    /// Record a refund and the updated sale bookkeeping in one transaction.
    ///
    /// The sale mutation is limited to `total_returned`, `status` and
    /// `updated_at`; everything else on a sale is immutable.
    pub fn store_refund(&self, refund: &Refund, updated_sale: &Sale) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut refunds = txn.open_table(REFUNDS_TABLE)?;
            refunds.insert(
                refund.refund_id.as_str(),
                serde_json::to_vec(refund)?.as_slice(),
            )?;

            let mut index = txn.open_table(REFUNDS_BY_SALE_TABLE)?;
            index.insert((refund.sale_id.as_str(), refund.refund_id.as_str()), ())?;

            let mut sales = txn.open_table(SALES_TABLE)?;
            sales.insert(
                updated_sale.sale_id.as_str(),
                serde_json::to_vec(updated_sale)?.as_slice(),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// All refunds issued against a sale
    pub fn refunds_for_sale(&self, sale_id: &str) -> StorageResult<Vec<Refund>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(REFUNDS_BY_SALE_TABLE)?;
        let table = read_txn.open_table(REFUNDS_TABLE)?;

        let mut refunds = Vec::new();
        let range_start = (sale_id, "");
        let range_end = (sale_id, "\u{10FFFF}");

        for result in index.range(range_start..=range_end)? {
            let (key, _) = result?;
            let (_, refund_id) = key.value();
            if let Some(value) = table.get(refund_id)? {
                refunds.push(serde_json::from_slice(value.value())?);
            }
        }

        Ok(refunds)
    }

    // ========== Expenses ==========

    /// Insert or overwrite an expense (single-purpose transaction)
    pub fn store_expense(&self, expense: &Expense) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(EXPENSES_TABLE)?;
            table.insert(expense.expense_id, serde_json::to_vec(expense)?.as_slice())?;

            let mut index = txn.open_table(EXPENSES_BY_TIME_TABLE)?;
            index.insert(
                (
                    expense.tenant_id.as_str(),
                    expense.created_at,
                    expense.expense_id,
                ),
                (),
            )?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get an expense by ID
    pub fn get_expense(&self, expense_id: i64) -> StorageResult<Option<Expense>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EXPENSES_TABLE)?;
        match table.get(expense_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Scan expenses for a tenant created in `[start, end)`.
    /// Soft-deleted records are filtered here, explicitly.
    pub fn expenses_in_window(
        &self,
        tenant_id: &str,
        start: i64,
        end: i64,
    ) -> StorageResult<Vec<Expense>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(EXPENSES_BY_TIME_TABLE)?;
        let table = read_txn.open_table(EXPENSES_TABLE)?;

        let mut expenses = Vec::new();
        let range_start = (tenant_id, start, i64::MIN);
        let range_end = (tenant_id, end, i64::MIN);

        for result in index.range(range_start..range_end)? {
            let (key, _) = result?;
            let (_, _, expense_id) = key.value();
            if let Some(value) = table.get(expense_id)? {
                let expense: Expense = serde_json::from_slice(value.value())?;
                if !expense.is_deleted() {
                    expenses.push(expense);
                }
            }
        }

        Ok(expenses)
    }

    // ========== Shifts ==========

    /// Open a shift with check-and-set semantics: fails (returns false)
    /// when the (tenant, store) pair already has an open shift.
    pub fn try_open_shift(&self, shift: &Shift) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let opened = {
            let mut active = txn.open_table(ACTIVE_SHIFTS_TABLE)?;
            let key = (shift.tenant_id.as_str(), shift.store_id.as_str());
            if active.get(key)?.is_some() {
                false
            } else {
                active.insert(key, shift.shift_id.as_str())?;
                let mut table = txn.open_table(SHIFTS_TABLE)?;
                table.insert(
                    shift.shift_id.as_str(),
                    serde_json::to_vec(shift)?.as_slice(),
                )?;
                true
            }
        };
        txn.commit()?;
        Ok(opened)
    }

    /// Persist a closed shift and release the active-shift slot
    pub fn close_shift(&self, shift: &Shift) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SHIFTS_TABLE)?;
            table.insert(
                shift.shift_id.as_str(),
                serde_json::to_vec(shift)?.as_slice(),
            )?;

            let mut active = txn.open_table(ACTIVE_SHIFTS_TABLE)?;
            active.remove((shift.tenant_id.as_str(), shift.store_id.as_str()))?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Get a shift by ID
    pub fn get_shift(&self, shift_id: &str) -> StorageResult<Option<Shift>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SHIFTS_TABLE)?;
        match table.get(shift_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// The open shift for a store, if any
    pub fn active_shift(&self, tenant_id: &str, store_id: &str) -> StorageResult<Option<Shift>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_SHIFTS_TABLE)?;
        let shift_id = match active.get((tenant_id, store_id))? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        drop(active);

        let table = read_txn.open_table(SHIFTS_TABLE)?;
        match table.get(shift_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// The open shift for a store, within the write transaction
    pub fn active_shift_txn(
        &self,
        txn: &WriteTransaction,
        tenant_id: &str,
        store_id: &str,
    ) -> StorageResult<Option<Shift>> {
        let active = txn.open_table(ACTIVE_SHIFTS_TABLE)?;
        let shift_id = match active.get((tenant_id, store_id))? {
            Some(guard) => guard.value().to_string(),
            None => return Ok(None),
        };
        drop(active);

        let table = txn.open_table(SHIFTS_TABLE)?;
        match table.get(shift_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}
