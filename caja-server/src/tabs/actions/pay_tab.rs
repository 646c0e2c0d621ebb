//! PayTab command handler
//!
//! Whole-tab payment. Rejected once a split is configured - split tabs are
//! settled group by group. Paying an Open tab implies the close step, so
//! the command emits TabClosed followed by TabPaid and both transitions
//! land in the audit trail atomically.

use async_trait::async_trait;

use crate::payments::recorder;
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::{CommandErrorCode, Tender};
use shared::tab::{EventPayload, TabEvent, TabEventType, TabStatus};

use super::load_owned_snapshot;

/// PayTab action
#[derive(Debug, Clone)]
pub struct PayTabAction {
    pub tab_id: String,
    pub tender: Tender,
}

#[async_trait]
impl CommandHandler for PayTabAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;

        if snapshot.is_split {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::TabIsSplit,
                format!(
                    "Tab {} is split; settle its groups individually",
                    self.tab_id
                ),
            ));
        }
        match snapshot.status {
            TabStatus::Open | TabStatus::ClosedPending => {}
            TabStatus::Paid => return Err(TabError::TabAlreadyPaid(self.tab_id.clone())),
            TabStatus::Cancelled => {
                return Err(TabError::TabAlreadyCancelled(self.tab_id.clone()));
            }
            TabStatus::SplitPending => {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::TabIsSplit,
                    format!("Tab {} is awaiting settlement payments", self.tab_id),
                ));
            }
        }

        // Build and stage the finalized sale; it commits with the events
        let sale = recorder::build_tab_sale(&snapshot, &self.tender)?;
        let sale_id = sale.sale_id.clone();
        let payments = sale.payments.clone();
        let payment_type = sale.payment_type;
        let final_total = sale.total;
        ctx.stage_sale(sale);

        let mut events = Vec::with_capacity(2);

        // Paying an open tab implies "bring the check" first
        if snapshot.status == TabStatus::Open {
            let seq = ctx.next_sequence();
            events.push(TabEvent::new(
                seq,
                self.tab_id.clone(),
                metadata.operator_id.clone(),
                metadata.operator_name.clone(),
                metadata.command_id.clone(),
                Some(metadata.timestamp),
                TabEventType::TabClosed,
                EventPayload::TabClosed {},
            ));
        }

        let seq = ctx.next_sequence();
        events.push(TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::TabPaid,
            EventPayload::TabPaid {
                sale_id,
                payment_type,
                payments,
                final_total,
            },
        ));

        Ok(events)
    }
}
