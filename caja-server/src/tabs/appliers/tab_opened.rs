//! TabOpened event applier
//!
//! Initializes the snapshot from the opening event. The manager creates an
//! empty snapshot for the new tab ID and this applier fills it in, so live
//! processing and replay share the same code path.

use crate::tabs::traits::EventApplier;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// TabOpened applier
pub struct TabOpenedApplier;

impl EventApplier for TabOpenedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::TabOpened {
            tenant_id,
            store_id,
            shift_id,
            folio,
            receipt_number,
            tables,
            server_id,
            server_name,
            guest_count,
            note,
        } = &event.payload
        {
            snapshot.tenant_id = tenant_id.clone();
            snapshot.store_id = store_id.clone();
            snapshot.shift_id = shift_id.clone();
            snapshot.folio = *folio;
            snapshot.receipt_number = receipt_number.clone();
            snapshot.tables = tables.clone();
            snapshot.server_id = server_id.clone();
            snapshot.server_name = server_name.clone();
            snapshot.guest_count = *guest_count;
            snapshot.note = note.clone();
            snapshot.status = TabStatus::Open;
            snapshot.opened_at = event.timestamp;
            snapshot.created_at = event.timestamp;
            snapshot.updated_at = event.timestamp;

            snapshot.push_status_change(
                TabStatus::Open,
                &event.operator_id,
                &event.operator_name,
                event.timestamp,
                None,
            );

            snapshot.last_sequence = event.sequence;
            snapshot.update_checksum();
        }
    }
}
