//! ApplyTip command handler

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::tabs::money::{self, to_decimal, to_f64};
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::TipKind;
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_open, load_owned_snapshot};

/// ApplyTip action - replaces the tab-level tip.
/// Percentage tips are computed against the subtotal, not the total.
#[derive(Debug, Clone)]
pub struct ApplyTipAction {
    pub tab_id: String,
    pub kind: TipKind,
    pub value: f64,
}

#[async_trait]
impl CommandHandler for ApplyTipAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        money::validate_tip(self.kind, self.value)?;

        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        ensure_open(&snapshot, &self.tab_id)?;

        let amount = match self.kind {
            TipKind::None => Decimal::ZERO,
            TipKind::Percentage => {
                to_decimal(snapshot.subtotal) * to_decimal(self.value) / Decimal::ONE_HUNDRED
            }
            TipKind::Fixed => to_decimal(self.value),
        };

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::TipApplied,
            EventPayload::TipApplied {
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
    async fn test_percentage_tip_computed_on_subtotal() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_open_tab(&storage, 200.0);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ApplyTipAction {
            tab_id: "tab-1".to_string(),
            kind: TipKind::Percentage,
            value: 5.0,
        };

        let events = action.execute(&mut ctx, &create_test_metadata()).await.unwrap();
        if let EventPayload::TipApplied { amount, .. } = &events[0].payload {
            assert_eq!(*amount, 10.0);
        } else {
            panic!("Expected TipApplied payload");
        }
    }

    #[tokio::test]
    async fn test_invalid_tip_percentage_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_open_tab(&storage, 200.0);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);

        let action = ApplyTipAction {
            tab_id: "tab-1".to_string(),
            kind: TipKind::Percentage,
            value: 120.0,
        };

        assert!(action.execute(&mut ctx, &create_test_metadata()).await.is_err());
    }
}
