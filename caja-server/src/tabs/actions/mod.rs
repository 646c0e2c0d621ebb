//! Tab command handlers
//!
//! One action per command. Actions validate against the staged snapshot
//! view and emit events; they never mutate snapshots themselves - that is
//! the appliers' job, shared with replay.

mod add_order;
mod apply_discount;
mod apply_tip;
mod cancel_tab;
mod close_tab;
mod configure_split;
mod open_tab;
mod pay_settlement;
mod pay_tab;
mod update_item_status;

pub use add_order::AddOrderAction;
pub use apply_discount::ApplyDiscountAction;
pub use apply_tip::ApplyTipAction;
pub use cancel_tab::CancelTabAction;
pub use close_tab::CloseTabAction;
pub use configure_split::ConfigureSplitAction;
pub use open_tab::OpenTabAction;
pub use pay_settlement::PaySettlementAction;
pub use pay_tab::PayTabAction;
pub use update_item_status::UpdateItemStatusAction;

use shared::tab::types::CommandErrorCode;
use shared::tab::{TabEvent, TabSnapshot, TabStatus};

use super::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};

/// CommandAction - dispatches to the concrete handler implementations
pub enum CommandAction {
    OpenTab(OpenTabAction),
    AddOrder(AddOrderAction),
    UpdateItemStatus(UpdateItemStatusAction),
    ApplyDiscount(ApplyDiscountAction),
    ApplyTip(ApplyTipAction),
    CloseTab(CloseTabAction),
    CancelTab(CancelTabAction),
    ConfigureSplit(ConfigureSplitAction),
    PayTab(PayTabAction),
    PaySettlement(PaySettlementAction),
}

impl CommandAction {
    pub async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        match self {
            CommandAction::OpenTab(a) => a.execute(ctx, metadata).await,
            CommandAction::AddOrder(a) => a.execute(ctx, metadata).await,
            CommandAction::UpdateItemStatus(a) => a.execute(ctx, metadata).await,
            CommandAction::ApplyDiscount(a) => a.execute(ctx, metadata).await,
            CommandAction::ApplyTip(a) => a.execute(ctx, metadata).await,
            CommandAction::CloseTab(a) => a.execute(ctx, metadata).await,
            CommandAction::CancelTab(a) => a.execute(ctx, metadata).await,
            CommandAction::ConfigureSplit(a) => a.execute(ctx, metadata).await,
            CommandAction::PayTab(a) => a.execute(ctx, metadata).await,
            CommandAction::PaySettlement(a) => a.execute(ctx, metadata).await,
        }
    }
}

// ============================================================================
// Shared validation
// ============================================================================

/// Load a snapshot and hide it from foreign tenants.
///
/// A tab owned by another tenant answers exactly like a missing tab, so
/// tenants cannot probe for each other's IDs.
pub(super) fn load_owned_snapshot(
    ctx: &CommandContext<'_>,
    tab_id: &str,
    tenant_id: &str,
) -> Result<TabSnapshot, TabError> {
    let snapshot = ctx.load_snapshot(tab_id)?;
    if snapshot.tenant_id != tenant_id {
        return Err(TabError::TabNotFound(tab_id.to_string()));
    }
    Ok(snapshot)
}

/// Require the tab to be in Open status
pub(super) fn ensure_open(snapshot: &TabSnapshot, tab_id: &str) -> Result<(), TabError> {
    match snapshot.status {
        TabStatus::Open => Ok(()),
        TabStatus::Paid => Err(TabError::TabAlreadyPaid(tab_id.to_string())),
        TabStatus::Cancelled => Err(TabError::TabAlreadyCancelled(tab_id.to_string())),
        TabStatus::ClosedPending | TabStatus::SplitPending => Err(TabError::InvalidOperation(
            CommandErrorCode::TabNotOpen,
            format!("Tab {} is no longer open for this operation", tab_id),
        )),
    }
}

/// Require the tab to be in any non-terminal status
pub(super) fn ensure_not_terminal(snapshot: &TabSnapshot, tab_id: &str) -> Result<(), TabError> {
    match snapshot.status {
        TabStatus::Paid => Err(TabError::TabAlreadyPaid(tab_id.to_string())),
        TabStatus::Cancelled => Err(TabError::TabAlreadyCancelled(tab_id.to_string())),
        _ => Ok(()),
    }
}
