//! PaySettlement command handler
//!
//! Pays one settlement group of a split tab. The group's sale is staged
//! into the same transaction as the SettlementPaid event; paying the last
//! pending group completes the tab (the applier handles the transition).

use async_trait::async_trait;

use crate::payments::recorder;
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::{CommandErrorCode, SettlementStatus, Tender};
use shared::tab::{EventPayload, TabEvent, TabEventType, TabStatus};

use super::load_owned_snapshot;

/// PaySettlement action
#[derive(Debug, Clone)]
pub struct PaySettlementAction {
    pub tab_id: String,
    pub group_index: u32,
    pub tender: Tender,
}

#[async_trait]
impl CommandHandler for PaySettlementAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;

        match snapshot.status {
            TabStatus::SplitPending => {}
            TabStatus::Paid => return Err(TabError::TabAlreadyPaid(self.tab_id.clone())),
            TabStatus::Cancelled => {
                return Err(TabError::TabAlreadyCancelled(self.tab_id.clone()));
            }
            TabStatus::Open | TabStatus::ClosedPending => {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::IncompatibleStatus,
                    format!("Tab {} has no split configured", self.tab_id),
                ));
            }
        }

        let group = snapshot
            .settlements
            .iter()
            .find(|g| g.index == self.group_index)
            .ok_or(TabError::SettlementNotFound(self.group_index))?;

        if group.status == SettlementStatus::Paid {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::SettlementAlreadyPaid,
                format!(
                    "Settlement group {} of tab {} is already paid",
                    self.group_index, self.tab_id
                ),
            ));
        }

        let sale = recorder::build_settlement_sale(&snapshot, group, &self.tender)?;
        let sale_id = sale.sale_id.clone();
        let payments = sale.payments.clone();
        let payment_type = sale.payment_type;
        let total = sale.total;
        ctx.stage_sale(sale);

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::SettlementPaid,
            EventPayload::SettlementPaid {
                group_index: self.group_index,
                sale_id,
                payment_type,
                payments,
                total,
            },
        );

        Ok(vec![event])
    }
}
