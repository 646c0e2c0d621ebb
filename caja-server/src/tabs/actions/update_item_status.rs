//! UpdateItemStatus command handler
//!
//! Kitchen progression for a single line item. Forward-only:
//! pending → preparing → ready → served, with cancelled reachable from any
//! non-terminal item state.

use async_trait::async_trait;

use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::{CommandErrorCode, ItemStatus};
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_not_terminal, load_owned_snapshot};

/// UpdateItemStatus action
#[derive(Debug, Clone)]
pub struct UpdateItemStatusAction {
    pub tab_id: String,
    pub order_idx: u32,
    pub item_idx: u32,
    pub status: ItemStatus,
}

#[async_trait]
impl CommandHandler for UpdateItemStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        // Kitchen status keeps moving while the check is out, so any
        // non-terminal tab status is acceptable here.
        ensure_not_terminal(&snapshot, &self.tab_id)?;

        let item = snapshot
            .item_at(self.order_idx, self.item_idx)
            .ok_or(TabError::ItemNotFound {
                order_idx: self.order_idx,
                item_idx: self.item_idx,
            })?;

        if !item.status.can_transition_to(self.status) {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::InvalidItemStatus,
                format!(
                    "Item '{}' cannot move from {:?} to {:?}",
                    item.name, item.status, self.status
                ),
            ));
        }

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::ItemStatusChanged,
            EventPayload::ItemStatusChanged {
                order_idx: self.order_idx,
                item_idx: self.item_idx,
                from: item.status,
                to: self.status,
            },
        );

        Ok(vec![event])
    }
}
