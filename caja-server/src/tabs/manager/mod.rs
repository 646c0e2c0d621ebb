//! TabsManager - core command processing and event generation
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Create CommandContext
//!     ├─ 4. Convert command to action and execute (events + staged sales)
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Persist events, snapshots, sales and the active-tab index
//!     ├─ 7. Mark command processed, advance the sequence
//!     ├─ 8. Commit transaction
//!     └─ 9. Return response
//! ```
//!
//! Everything in steps 4-7 lives inside ONE redb write transaction: the
//! occupancy check-and-set, the folio increment, the audit events, the
//! snapshot, any finalized sale and the table release commit together or
//! not at all.

mod error;
pub use error::*;

use std::collections::HashMap;
use std::sync::Arc;

use chrono_tz::Tz;

use shared::models::Product;
use shared::tab::{
    CommandResponse, EventPayload, TabCommand, TabCommandPayload, TabEvent, TabSnapshot,
};

use super::actions::{
    AddOrderAction, ApplyDiscountAction, ApplyTipAction, CancelTabAction, CloseTabAction,
    CommandAction, ConfigureSplitAction, OpenTabAction, PaySettlementAction, PayTabAction,
};
use super::appliers::EventAction;
use super::storage::TabStorage;
use super::traits::{CommandContext, CommandMetadata, EventApplier};
use crate::catalog::CatalogService;

/// TabsManager for command processing
pub struct TabsManager {
    storage: TabStorage,
    catalog: Arc<CatalogService>,
    /// Business timezone (receipt number date part)
    tz: Tz,
}

impl std::fmt::Debug for TabsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabsManager")
            .field("storage", &"<TabStorage>")
            .field("tz", &self.tz)
            .finish()
    }
}

impl TabsManager {
    pub fn new(storage: TabStorage, catalog: Arc<CatalogService>, tz: Tz) -> Self {
        Self {
            storage,
            catalog,
            tz,
        }
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &TabStorage {
        &self.storage
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: TabCommand) -> CommandResponse {
        self.execute_command_with_events(cmd).0
    }

    /// Execute a command and return both the response and generated events
    pub fn execute_command_with_events(
        &self,
        cmd: TabCommand,
    ) -> (CommandResponse, Vec<TabEvent>) {
        match self.process_command(cmd.clone()) {
            Ok((response, events)) => (response, events),
            Err(err) => (CommandResponse::error(cmd.command_id, err.into()), vec![]),
        }
    }

    /// Get a tab snapshot, scoped to the acting tenant
    pub fn get_snapshot(&self, tenant_id: &str, tab_id: &str) -> ManagerResult<Option<TabSnapshot>> {
        let snapshot = self.storage.get_snapshot(tab_id)?;
        Ok(snapshot.filter(|s| s.tenant_id == tenant_id))
    }

    /// All active tabs of a tenant
    pub fn get_active_tabs(&self, tenant_id: &str) -> ManagerResult<Vec<TabSnapshot>> {
        Ok(self.storage.get_active_tabs(tenant_id)?)
    }

    /// Full event stream of a tab, scoped to the acting tenant
    pub fn get_events(&self, tenant_id: &str, tab_id: &str) -> ManagerResult<Vec<TabEvent>> {
        match self.get_snapshot(tenant_id, tab_id)? {
            Some(_) => Ok(self.storage.get_events_for_tab(tab_id)?),
            None => Ok(vec![]),
        }
    }

    /// Catalog metadata for the items of an AddOrder command
    fn products_for_items(&self, items: &[shared::tab::types::OrderItemInput]) -> HashMap<String, Product> {
        let ids: Vec<String> = items.iter().map(|i| i.product_id.clone()).collect();
        self.catalog.get_batch(&ids)
    }

    /// Convert a command payload into its action, injecting manager-held
    /// context (catalog metadata, business timezone)
    fn build_action(&self, cmd: &TabCommand) -> CommandAction {
        match &cmd.payload {
            TabCommandPayload::OpenTab {
                store_id,
                tables,
                server_id,
                server_name,
                guest_count,
                note,
            } => CommandAction::OpenTab(OpenTabAction {
                store_id: store_id.clone(),
                tables: tables.clone(),
                server_id: server_id.clone(),
                server_name: server_name.clone(),
                guest_count: *guest_count,
                note: note.clone(),
                tz: self.tz,
            }),
            TabCommandPayload::AddOrder { tab_id, items } => {
                CommandAction::AddOrder(AddOrderAction {
                    tab_id: tab_id.clone(),
                    items: items.clone(),
                    products: self.products_for_items(items),
                })
            }
            TabCommandPayload::UpdateItemStatus {
                tab_id,
                order_idx,
                item_idx,
                status,
            } => CommandAction::UpdateItemStatus(super::actions::UpdateItemStatusAction {
                tab_id: tab_id.clone(),
                order_idx: *order_idx,
                item_idx: *item_idx,
                status: *status,
            }),
            TabCommandPayload::ApplyDiscount {
                tab_id,
                kind,
                value,
            } => CommandAction::ApplyDiscount(ApplyDiscountAction {
                tab_id: tab_id.clone(),
                kind: *kind,
                value: *value,
            }),
            TabCommandPayload::ApplyTip {
                tab_id,
                kind,
                value,
            } => CommandAction::ApplyTip(ApplyTipAction {
                tab_id: tab_id.clone(),
                kind: *kind,
                value: *value,
            }),
            TabCommandPayload::CloseTab { tab_id } => CommandAction::CloseTab(CloseTabAction {
                tab_id: tab_id.clone(),
            }),
            TabCommandPayload::CancelTab { tab_id, reason } => {
                CommandAction::CancelTab(CancelTabAction {
                    tab_id: tab_id.clone(),
                    reason: reason.clone(),
                })
            }
            TabCommandPayload::ConfigureSplit { tab_id, groups } => {
                CommandAction::ConfigureSplit(ConfigureSplitAction {
                    tab_id: tab_id.clone(),
                    groups: groups.clone(),
                })
            }
            TabCommandPayload::PayTab { tab_id, tender } => CommandAction::PayTab(PayTabAction {
                tab_id: tab_id.clone(),
                tender: tender.clone(),
            }),
            TabCommandPayload::PaySettlement {
                tab_id,
                group_index,
                tender,
            } => CommandAction::PaySettlement(PaySettlementAction {
                tab_id: tab_id.clone(),
                group_index: *group_index,
                tender: tender.clone(),
            }),
        }
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: TabCommand,
    ) -> ManagerResult<(CommandResponse, Vec<TabEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within the transaction
        if self.storage.is_command_processed_txn(&txn, &cmd.command_id)? {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 3. Create context and metadata
        let current_sequence = self.storage.get_current_sequence()?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            tenant_id: cmd.tenant_id.clone(),
            operator_id: cmd.operator_id.clone(),
            operator_name: cmd.operator_name.clone(),
            timestamp: cmd.timestamp,
        };

        // 4. Convert to action and execute
        let action = self.build_action(&cmd);
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))?;

        // 5. Apply events to snapshots (same appliers replay uses)
        for event in &events {
            let mut snapshot = match &event.payload {
                EventPayload::TabOpened { .. } => TabSnapshot::new(event.tab_id.clone()),
                _ => ctx.load_snapshot(&event.tab_id).map_err(ManagerError::from)?,
            };
            EventAction::from(event).apply(&mut snapshot, event);
            ctx.save_snapshot(snapshot);
        }

        // 6. Persist events, snapshots, sales and indices
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }
        let mut new_tab_id = None;
        for snapshot in ctx.take_snapshots() {
            if matches!(
                events.first().map(|e| &e.payload),
                Some(EventPayload::TabOpened { .. })
            ) && snapshot.tab_id == events[0].tab_id
            {
                new_tab_id = Some(snapshot.tab_id.clone());
            }
            if snapshot.is_active() {
                self.storage.mark_tab_active(&txn, &snapshot.tab_id)?;
            } else {
                // Terminal: the table resource is released with this commit
                self.storage.mark_tab_inactive(&txn, &snapshot.tab_id)?;
            }
            self.storage.store_snapshot(&txn, &snapshot)?;
        }
        for sale in ctx.take_sales() {
            self.storage.store_sale(&txn, &sale)?;
            tracing::info!(
                sale_id = %sale.sale_id,
                tab_id = %sale.tab_id,
                total = sale.total,
                "Finalized sale recorded"
            );
        }

        // 7. Advance sequence and mark command processed
        self.storage.set_sequence(&txn, ctx.current_sequence())?;
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 8. Commit
        txn.commit().map_err(super::storage::StorageError::from)?;

        Ok((CommandResponse::success(cmd.command_id, new_tab_id), events))
    }
}

#[cfg(test)]
mod tests;
