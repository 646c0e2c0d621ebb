//! OrderAdded event applier

use crate::tabs::{money, traits::EventApplier};
use shared::tab::types::OrderBatch;
use shared::tab::{EventPayload, TabEvent, TabSnapshot};

/// OrderAdded applier - appends the batch and recomputes totals
pub struct OrderAddedApplier;

impl EventApplier for OrderAddedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::OrderAdded {
            order_idx: _,
            ordered_at,
            items,
        } = &event.payload
        {
            snapshot.orders.push(OrderBatch {
                ordered_at: *ordered_at,
                items: items.clone(),
            });

            money::recalculate_totals(snapshot);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
