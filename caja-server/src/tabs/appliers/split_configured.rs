//! SplitConfigured event applier

use crate::tabs::traits::EventApplier;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// SplitConfigured applier - stores the validated groups, locks whole-tab
/// payment via `is_split`, and moves the tab to SplitPending
pub struct SplitConfiguredApplier;

impl EventApplier for SplitConfiguredApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::SplitConfigured { groups } = &event.payload {
            snapshot.is_split = true;
            snapshot.settlements = groups.clone();
            snapshot.status = TabStatus::SplitPending;
            snapshot.push_status_change(
                TabStatus::SplitPending,
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
