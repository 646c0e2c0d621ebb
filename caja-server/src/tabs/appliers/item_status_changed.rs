//! ItemStatusChanged event applier

use crate::tabs::{money, traits::EventApplier};
use shared::tab::types::{ItemStatus, ItemStatusStamp};
use shared::tab::{EventPayload, TabEvent, TabSnapshot};

/// ItemStatusChanged applier - advances the item's kitchen status and
/// records the transition timestamp. Cancelling an item drops it from the
/// subtotal, so totals are recomputed.
pub struct ItemStatusChangedApplier;

impl EventApplier for ItemStatusChangedApplier {
    fn apply(&self, snapshot: &mut TabSnapshot, event: &TabEvent) {
        if let EventPayload::ItemStatusChanged {
            order_idx,
            item_idx,
            from: _,
            to,
        } = &event.payload
        {
            let Some(batch) = snapshot.orders.get_mut(*order_idx as usize) else {
                return;
            };
            let Some(item) = batch.items.get_mut(*item_idx as usize) else {
                return;
            };

            item.status = *to;
            item.status_log.push(ItemStatusStamp {
                status: *to,
                timestamp: event.timestamp,
            });

            if *to == ItemStatus::Cancelled {
                money::recalculate_totals(snapshot);
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
            snapshot.update_checksum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::tab::types::{LineItem, OrderBatch};
    use shared::tab::TabEventType;

    fn snapshot_with_one_item() -> TabSnapshot {
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.orders.push(OrderBatch {
            ordered_at: 0,
            items: vec![LineItem {
                product_id: "p1".to_string(),
                name: "Café".to_string(),
                category_name: None,
                unit_price: 2.5,
                quantity: 2,
                note: None,
                status: ItemStatus::Pending,
                status_log: vec![],
            }],
        });
        money::recalculate_totals(&mut snapshot);
        snapshot
    }

    fn status_event(seq: u64, from: ItemStatus, to: ItemStatus) -> TabEvent {
        TabEvent::new(
            seq,
            "tab-1".to_string(),
            "op-1".to_string(),
            "Ana".to_string(),
            "cmd-1".to_string(),
            None,
            TabEventType::ItemStatusChanged,
            EventPayload::ItemStatusChanged {
                order_idx: 0,
                item_idx: 0,
                from,
                to,
            },
        )
    }

    #[test]
    fn test_status_change_records_timestamp() {
        let mut snapshot = snapshot_with_one_item();

        let event = status_event(1, ItemStatus::Pending, ItemStatus::Preparing);
        ItemStatusChangedApplier.apply(&mut snapshot, &event);

        let item = snapshot.item_at(0, 0).unwrap();
        assert_eq!(item.status, ItemStatus::Preparing);
        assert_eq!(item.status_log.len(), 1);
        assert_eq!(item.status_log[0].timestamp, event.timestamp);
    }

    #[test]
    fn test_cancelling_item_excludes_it_from_totals() {
        let mut snapshot = snapshot_with_one_item();
        assert_eq!(snapshot.total, 5.0);

        let event = status_event(1, ItemStatus::Pending, ItemStatus::Cancelled);
        ItemStatusChangedApplier.apply(&mut snapshot, &event);

        assert_eq!(snapshot.subtotal, 0.0);
        assert_eq!(snapshot.total, 0.0);
    }
}
