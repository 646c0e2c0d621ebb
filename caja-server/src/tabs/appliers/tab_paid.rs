//! TabPaid event applier

use crate::tabs::traits::EventApplier;
use shared::tab::{EventPayload, TabEvent, TabSnapshot, TabStatus};

/// TabPaid applier - terminal transition for whole-tab payment
pub struct TabPaidApplier;

impl EventApplier for TabPaidApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::TabPaid {
            sale_id,
            payment_type: _,
            payments: _,
            final_total: _,
        } = &event.payload
        {
            snapshot.status = TabStatus::Paid;
            snapshot.closed_at = Some(event.timestamp);
            snapshot.sale_ids.push(sale_id.clone());
            snapshot.push_status_change(
                TabStatus::Paid,
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

#[cfg(test)]
mod tests {
    use super::*;
    use shared::tab::types::PaymentType;
    use shared::tab::TabEventType;

    #[test]
    fn test_tab_paid_links_sale_and_terminates() {
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.status = TabStatus::ClosedPending;

        let event = TabEvent::new(
            5,
            "tab-1".to_string(),
            "op-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            None,
            TabEventType::TabPaid,
            EventPayload::TabPaid {
                sale_id: "sale-1".to_string(),
                payment_type: PaymentType::Single,
                payments: vec![],
                final_total: 117.0,
            },
        );

        TabPaidApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.status, TabStatus::Paid);
        assert_eq!(snapshot.sale_ids, vec!["sale-1".to_string()]);
        assert_eq!(snapshot.closed_at, Some(event.timestamp));
        assert_eq!(snapshot.last_sequence, 5);
    }
}
