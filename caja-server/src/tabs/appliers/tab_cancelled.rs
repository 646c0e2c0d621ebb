//! TabCancelled event applier

use crate::tabs::traits::EventApplier;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// TabCancelled applier - terminal transition; the manager releases the
/// tables by dropping the tab from the active index in the same commit
pub struct TabCancelledApplier;

impl EventApplier for TabCancelledApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::TabCancelled { reason } = &event.payload {
            snapshot.status = TabStatus::Cancelled;
            snapshot.closed_at = Some(event.timestamp);
            snapshot.push_status_change(
                TabStatus::Cancelled,
                &event.operator_id,
                &event.operator_name,
                event.timestamp,
                reason.clone(),
            );

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
