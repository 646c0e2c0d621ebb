//! OpenTab command handler
//!
//! Creates a new tab on one or more tables. Table occupancy, the active
//! shift lookup and the folio increment all happen inside the command's
//! write transaction, so a concurrent open of the same table serializes
//! behind this one and fails cleanly.

use async_trait::async_trait;
use chrono_tz::Tz;
use tracing::info;
use uuid::Uuid;

use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::{CommandErrorCode, TableRef};
use shared::tab::{EventPayload, TabEvent, TabEventType};

/// OpenTab action
#[derive(Debug, Clone)]
pub struct OpenTabAction {
    pub store_id: String,
    pub tables: Vec<TableRef>,
    pub server_id: String,
    pub server_name: String,
    pub guest_count: i32,
    pub note: Option<String>,
    /// Business timezone, used for the receipt number date part
    pub tz: Tz,
}

impl OpenTabAction {
    /// Receipt numbers follow the folio: FAC{YYYYMMDD}{10000+folio}
    fn receipt_number(&self, folio: u64) -> String {
        let date_str = chrono::Utc::now()
            .with_timezone(&self.tz)
            .format("%Y%m%d")
            .to_string();
        format!("FAC{}{}", date_str, 10_000 + folio)
    }
}

#[async_trait]
impl CommandHandler for OpenTabAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        if self.tables.is_empty() {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::TableOccupied,
                "A tab must reference at least one table".to_string(),
            ));
        }
        if self.guest_count < 1 {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::InvalidQuantity,
                format!("guest count must be at least 1, got {}", self.guest_count),
            ));
        }

        // 1. A shift must be open for this store
        let shift = ctx
            .active_shift(&metadata.tenant_id, &self.store_id)?
            .ok_or_else(|| TabError::NoActiveShift(self.store_id.clone()))?;

        // 2. Check-and-set: every referenced table must be free
        for table in &self.tables {
            if let Some(existing) =
                ctx.find_active_tab_for_table(&metadata.tenant_id, &table.table_id)?
            {
                return Err(TabError::TableOccupied(format!(
                    "Table {} is already occupied (tab: {})",
                    table.table_name, existing
                )));
            }
        }

        // 3. Allocate folio atomically with the tab creation
        let folio = ctx.next_folio(&metadata.tenant_id)?;
        let receipt_number = self.receipt_number(folio);

        let tab_id = Uuid::new_v4().to_string();
        let seq = ctx.next_sequence();

        let event = TabEvent::new(
            seq,
            tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::TabOpened,
            EventPayload::TabOpened {
                tenant_id: metadata.tenant_id.clone(),
                store_id: self.store_id.clone(),
                shift_id: shift.shift_id.clone(),
                folio,
                receipt_number: receipt_number.clone(),
                tables: self.tables.clone(),
                server_id: self.server_id.clone(),
                server_name: self.server_name.clone(),
                guest_count: self.guest_count,
                note: self.note.clone(),
            },
        );

        info!(
            tab_id = %tab_id,
            folio,
            receipt_number = %receipt_number,
            tables = self.tables.len(),
            "Tab opened"
        );
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::appliers::TabOpenedApplier;
    use crate::tabs::storage::TabStorage;
    use crate::tabs::traits::{CommandContext, EventApplier};
    use shared::models::{Shift, ShiftStatus};
    use shared::tab::TabSnapshot;

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            tenant_id: "tenant-1".to_string(),
            operator_id: "op-1".to_string(),
            operator_name: "Ana".to_string(),
            timestamp: 1234567890,
        }
    }

    fn seed_shift(storage: &TabStorage) {
        let now = shared::util::now_millis();
        storage
            .try_open_shift(&Shift {
                shift_id: "shift-1".to_string(),
                tenant_id: "tenant-1".to_string(),
                store_id: "store-1".to_string(),
                operator_id: "op-1".to_string(),
                operator_name: "Ana".to_string(),
                status: ShiftStatus::Open,
                opened_at: now,
                closed_at: None,
                starting_cash: 0.0,
                expected_cash: None,
                actual_cash: None,
                cash_variance: None,
                note: None,
                created_at: now,
                updated_at: now,
            })
            .unwrap();
    }

    fn action(tables: Vec<TableRef>) -> OpenTabAction {
        OpenTabAction {
            store_id: "store-1".to_string(),
            tables,
            server_id: "emp-1".to_string(),
            server_name: "Luis".to_string(),
            guest_count: 2,
            note: None,
            tz: chrono_tz::Europe::Madrid,
        }
    }

    fn mesa(id: &str) -> TableRef {
        TableRef {
            table_id: id.to_string(),
            table_name: format!("Mesa {id}"),
        }
    }

    #[tokio::test]
    async fn test_open_tab_success() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_shift(&storage);
        let txn = storage.begin_write().unwrap();
        let current_seq = storage.get_current_sequence().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, current_seq);

        let events = action(vec![mesa("T1")])
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, TabEventType::TabOpened);
        if let EventPayload::TabOpened {
            folio,
            receipt_number,
            shift_id,
            ..
        } = &events[0].payload
        {
            assert_eq!(*folio, 1);
            assert!(receipt_number.starts_with("FAC"));
            assert_eq!(shift_id, "shift-1");
        } else {
            panic!("Expected TabOpened payload");
        }
    }

    #[tokio::test]
    async fn test_open_tab_without_shift_fails() {
        let storage = TabStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(vec![mesa("T1")])
            .execute(&mut ctx, &create_test_metadata())
            .await;

        assert!(matches!(result, Err(TabError::NoActiveShift(_))));
    }

    #[tokio::test]
    async fn test_open_tab_occupied_table_fails() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_shift(&storage);

        // Existing active tab holding T1
        let txn = storage.begin_write().unwrap();
        let mut existing = TabSnapshot::new("existing-tab".to_string());
        existing.tenant_id = "tenant-1".to_string();
        existing.tables = vec![mesa("T1")];
        storage.store_snapshot(&txn, &existing).unwrap();
        storage.mark_tab_active(&txn, "existing-tab").unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let result = action(vec![mesa("T1")])
            .execute(&mut ctx, &create_test_metadata())
            .await;

        assert!(matches!(result, Err(TabError::TableOccupied(_))));
    }

    #[tokio::test]
    async fn test_open_multi_table_tab_checks_every_table() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_shift(&storage);

        let txn = storage.begin_write().unwrap();
        let mut existing = TabSnapshot::new("existing-tab".to_string());
        existing.tenant_id = "tenant-1".to_string();
        existing.tables = vec![mesa("T7")];
        storage.store_snapshot(&txn, &existing).unwrap();
        storage.mark_tab_active(&txn, "existing-tab").unwrap();
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        // T5 is free but T7 is taken - the open must fail as a whole
        let result = action(vec![mesa("T5"), mesa("T7")])
            .execute(&mut ctx, &create_test_metadata())
            .await;

        assert!(matches!(result, Err(TabError::TableOccupied(_))));
    }

    #[tokio::test]
    async fn test_folios_increase_across_opens() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_shift(&storage);
        let metadata = create_test_metadata();

        let mut folios = Vec::new();
        for i in 0..3 {
            let txn = storage.begin_write().unwrap();
            let current_seq = storage.get_current_sequence().unwrap();
            let mut ctx = CommandContext::new(&txn, &storage, current_seq);
            let events = action(vec![mesa(&format!("T{i}"))])
                .execute(&mut ctx, &metadata)
                .await
                .unwrap();
            if let EventPayload::TabOpened { folio, .. } = &events[0].payload {
                folios.push(*folio);
            }
            // Apply + persist so the next open sees the occupancy
            let mut snapshot = TabSnapshot::new(events[0].tab_id.clone());
            TabOpenedApplier.apply(&mut snapshot, &events[0]);
            storage.store_snapshot(&txn, &snapshot).unwrap();
            storage.mark_tab_active(&txn, &events[0].tab_id).unwrap();
            txn.commit().unwrap();
        }

        assert_eq!(folios, vec![1, 2, 3]);
    }
}
