//! SettlementPaid event applier

use crate::tabs::traits::EventApplier;
use shared::tab::types::SettlementStatus;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// SettlementPaid applier - marks the group paid and links its sale.
/// Paying the last pending group also moves the tab to Paid; the manager
/// releases the tables in the same commit.
pub struct SettlementPaidApplier;

impl EventApplier for SettlementPaidApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::SettlementPaid {
            group_index,
            sale_id,
            payment_type: _,
            payments: _,
            total: _,
        } = &event.payload
        {
            let Some(group) = snapshot
                .settlements
                .iter_mut()
                .find(|g| g.index == *group_index)
            else {
                return;
            };

            group.status = SettlementStatus::Paid;
            group.sale_id = Some(sale_id.clone());
            group.paid_at = Some(event.timestamp);
            snapshot.sale_ids.push(sale_id.clone());

            if snapshot.all_settlements_paid() {
                snapshot.status = TabStatus::Paid;
                snapshot.closed_at = Some(event.timestamp);
                snapshot.push_status_change(
                    TabStatus::Paid,
                    &event.operator_id,
                    &event.operator_name,
                    event.timestamp,
                    None,
                );
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}
