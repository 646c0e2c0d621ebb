//! DiscountApplied event applier

use crate::tabs::{money, traits::EventApplier};
use shared::tab::types::Discount;
use shared::tab::{EventPayload, TabEvent, TabSnapshot};

/// DiscountApplied applier - replaces the tab-level discount and
/// recomputes totals (the stored amount is always the recomputed one)
pub struct DiscountAppliedApplier;

impl EventApplier for DiscountAppliedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::DiscountApplied { kind, value, amount: _ } = &event.payload {
            snapshot.discount = Some(Discount {
                kind: *kind,
                value: *value,
                amount: 0.0,
            });

            money::recalculate_totals(snapshot);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
