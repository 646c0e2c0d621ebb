//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles one
//! specific event type. Appliers are PURE functions of
//! (snapshot, event) - the same code path serves live command processing
//! and event replay.

use enum_dispatch::enum_dispatch;

use shared::tab::{EventPayload, TabEvent, TabSnapshot};

use super::traits::EventApplier;

mod discount_applied;
mod item_status_changed;
mod order_added;
mod settlement_paid;
mod split_configured;
mod tab_cancelled;
mod tab_closed;
mod tab_opened;
mod tab_paid;
mod tip_applied;

pub use discount_applied::DiscountAppliedApplier;
pub use item_status_changed::ItemStatusChangedApplier;
pub use order_added::OrderAddedApplier;
pub use settlement_paid::SettlementPaidApplier;
pub use split_configured::SplitConfiguredApplier;
pub use tab_cancelled::TabCancelledApplier;
pub use tab_closed::TabClosedApplier;
pub use tab_opened::TabOpenedApplier;
pub use tab_paid::TabPaidApplier;
pub use tip_applied::TipAppliedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    TabOpened(TabOpenedApplier),
    OrderAdded(OrderAddedApplier),
    ItemStatusChanged(ItemStatusChangedApplier),
    DiscountApplied(DiscountAppliedApplier),
    TipApplied(TipAppliedApplier),
    TabClosed(TabClosedApplier),
    TabCancelled(TabCancelledApplier),
    SplitConfigured(SplitConfiguredApplier),
    SettlementPaid(SettlementPaidApplier),
    TabPaid(TabPaidApplier),
}

/// Convert TabEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&TabEvent> for EventAction {
    fn from(event: &TabEvent) -> Self {
        match &event.payload {
            EventPayload::TabOpened { .. } => EventAction::TabOpened(TabOpenedApplier),
            EventPayload::OrderAdded { .. } => EventAction::OrderAdded(OrderAddedApplier),
            EventPayload::ItemStatusChanged { .. } => {
                EventAction::ItemStatusChanged(ItemStatusChangedApplier)
            }
            EventPayload::DiscountApplied { .. } => {
                EventAction::DiscountApplied(DiscountAppliedApplier)
            }
            EventPayload::TipApplied { .. } => EventAction::TipApplied(TipAppliedApplier),
            EventPayload::TabClosed { .. } => EventAction::TabClosed(TabClosedApplier),
            EventPayload::TabCancelled { .. } => EventAction::TabCancelled(TabCancelledApplier),
            EventPayload::SplitConfigured { .. } => {
                EventAction::SplitConfigured(SplitConfiguredApplier)
            }
            EventPayload::SettlementPaid { .. } => {
                EventAction::SettlementPaid(SettlementPaidApplier)
            }
            EventPayload::TabPaid { .. } => EventAction::TabPaid(TabPaidApplier),
        }
    }
}
