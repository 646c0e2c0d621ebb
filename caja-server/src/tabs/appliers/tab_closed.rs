//! TabClosed event applier

use crate::tabs::traits::EventApplier;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// TabClosed applier - "bring the check": no more ordering, awaiting payment
pub struct TabClosedApplier;

impl EventApplier for TabClosedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::TabClosed {} = &event.payload {
            snapshot.status = TabStatus::ClosedPending;
            snapshot.push_status_change(
                TabStatus::ClosedPending,
                &event.operator_id,
                &event.operator_name,
                event.timestamp,
                None,
            );

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
