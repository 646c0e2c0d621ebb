//! ApplyDiscount command handler

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::tabs::money::{self, to_decimal, to_f64};
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::AdjustmentKind;
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_open, load_owned_snapshot};

/// ApplyDiscount action - replaces the tab-level discount
#[derive(Debug, Clone)]
pub struct ApplyDiscountAction {
    pub tab_id: String,
    pub kind: AdjustmentKind,
    pub value: f64,
}

#[async_trait]
impl CommandHandler for ApplyDiscountAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        money::validate_discount(self.kind, self.value)?;

        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        ensure_open(&snapshot, &self.tab_id)?;

        // Computed amount recorded for audit; the applier recomputes it
        // against the live subtotal anyway.
        let subtotal = to_decimal(snapshot.subtotal);
        let amount = match self.kind {
            AdjustmentKind::Percentage => subtotal * to_decimal(self.value) / Decimal::ONE_HUNDRED,
            AdjustmentKind::Fixed => to_decimal(self.value).min(subtotal),
        };

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::DiscountApplied,
            EventPayload::DiscountApplied {
                kind: self.kind,
                value: self.value,
                amount: to_f64(amount),
            },
        );

        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::storage::TabStorage;
    use crate::tabs::traits::CommandContext;
    use shared::tab::{TabSnapshot, TabStatus};

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            tenant_id: "tenant-1".to_string(),
            operator_id: "op-1".to_string(),
            operator_name: "Ana".to_string(),
            timestamp: 1234567890,
        }
    }

    fn seed_open_tab(storage: &TabStorage, subtotal: f64) {
        let txn = storage.begin_write().unwrap();
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.tenant_id = "tenant-1".to_string();
        snapshot.status = TabStatus::Open;
        snapshot.subtotal = subtotal;
        snapshot.total = subtotal;
        storage.store_snapshot(&txn, &snapshot).unwrap();
        txn.commit().unwrap();
    }

    #[tokio::test]
    async fn test_percentage_discount_amount_in_event() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_open_tab(&storage, 130.0);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ApplyDiscountAction {
            tab_id: "tab-1".to_string(),
            kind: AdjustmentKind::Percentage,
            value: 10.0,
        };

        let events = action.execute(&mut ctx, &create_test_metadata()).await.unwrap();
        if let EventPayload::DiscountApplied { amount, .. } = &events[0].payload {
            assert_eq!(*amount, 13.0);
        } else {
            panic!("Expected DiscountApplied payload");
        }
    }

    #[tokio::test]
    async fn test_percentage_over_100_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_open_tab(&storage, 100.0);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ApplyDiscountAction {
            tab_id: "tab-1".to_string(),
            kind: AdjustmentKind::Percentage,
            value: 101.0,
        };

        assert!(action.execute(&mut ctx, &create_test_metadata()).await.is_err());
    }

    #[tokio::test]
    async fn test_negative_discount_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_open_tab(&storage, 100.0);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ApplyDiscountAction {
            tab_id: "tab-1".to_string(),
            kind: AdjustmentKind::Fixed,
            value: -5.0,
        };

        assert!(action.execute(&mut ctx, &create_test_metadata()).await.is_err());
    }
}
