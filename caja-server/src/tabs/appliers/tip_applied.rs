//! TipApplied event applier

use crate::tabs::{money, traits::EventApplier};
use shared::tab::types::Tip;
use shared::tab::{EventPayload, TabEvent, TabSnapshot};

/// TipApplied applier - replaces the tab-level tip and recomputes totals
pub struct TipAppliedApplier;

impl EventApplier for TipAppliedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::TipApplied { kind, value, amount: _ } = &event.payload {
            snapshot.tip = Tip {
                kind: *kind,
                value: *value,
                amount: 0.0,
            };

            money::recalculate_totals(snapshot);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
