//! CloseTab command handler
//!
//! "Bring the check": the tab stops accepting orders and waits for
//! whole-tab payment. No money moves here.

use async_trait::async_trait;

use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_open, load_owned_snapshot};

/// CloseTab action
#[derive(Debug, Clone)]
pub struct CloseTabAction {
    pub tab_id: String,
}

#[async_trait]
impl CommandHandler for CloseTabAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        ensure_open(&snapshot, &self.tab_id)?;

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::TabClosed,
            EventPayload::TabClosed {},
        );

        Ok(vec![event])
    }
}
