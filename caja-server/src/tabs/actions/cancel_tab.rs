//! CancelTab command handler
//!
//! Allowed from any non-terminal state. The reason lands in the audit
//! trail; the manager releases the tables in the same commit.

use async_trait::async_trait;

use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_not_terminal, load_owned_snapshot};

/// CancelTab action
#[derive(Debug, Clone)]
pub struct CancelTabAction {
    pub tab_id: String,
    pub reason: Option<String>,
}

#[async_trait]
impl CommandHandler for CancelTabAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        ensure_not_terminal(&snapshot, &self.tab_id)?;

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::TabCancelled,
            EventPayload::TabCancelled {
                reason: self.reason.clone(),
            },
        );

        Ok(vec![event])
    }
}
