//! ConfigureSplit command handler
//!
//! Partitions the tab's billable items into settlement groups. The
//! validation is exhaustive and reports the first violated rule with its
//! offending coordinates, leaving the tab untouched on failure:
//!
//! 1. every claim must reference an existing, non-cancelled item with a
//!    positive quantity;
//! 2. per item, the quantities claimed across all groups must equal the
//!    item's order quantity exactly - nothing unallocated, nothing claimed
//!    twice;
//! 3. the group totals must add up to the tab total within one cent.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::tabs::money::{to_decimal, to_f64, MONEY_TOLERANCE};
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::tab::types::{
    CommandErrorCode, SettlementGroup, SettlementGroupInput, SettlementStatus,
};
use shared::tab::{EventPayload, TabEvent, TabEventType, TabSnapshot, TabStatus};

use super::load_owned_snapshot;

/// ConfigureSplit action
#[derive(Debug, Clone)]
pub struct ConfigureSplitAction {
    pub tab_id: String,
    pub groups: Vec<SettlementGroupInput>,
}

#[async_trait]
impl CommandHandler for ConfigureSplitAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;

        match snapshot.status {
            TabStatus::Open => {}
            TabStatus::Paid => return Err(TabError::TabAlreadyPaid(self.tab_id.clone())),
            TabStatus::Cancelled => {
                return Err(TabError::TabAlreadyCancelled(self.tab_id.clone()));
            }
            TabStatus::SplitPending | TabStatus::ClosedPending => {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::SplitLocked,
                    format!("Tab {} can no longer be reconfigured", self.tab_id),
                ));
            }
        }
        // Paranoia: a paid settlement means the split is structurally frozen
        if snapshot
            .settlements
            .iter()
            .any(|g| g.status == SettlementStatus::Paid)
        {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::SplitLocked,
                format!("Tab {} already has paid settlements", self.tab_id),
            ));
        }

        if self.groups.is_empty() {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::EmptySplit,
                "A split needs at least one settlement group".to_string(),
            ));
        }

        validate_claims(&snapshot, &self.groups)?;
        validate_total_conservation(&snapshot, &self.groups)?;

        let groups: Vec<SettlementGroup> = self
            .groups
            .iter()
            .enumerate()
            .map(|(idx, input)| SettlementGroup {
                index: idx as u32,
                claims: input.claims.clone(),
                subtotal: input.subtotal,
                tip: input.tip,
                total: input.total,
                status: SettlementStatus::Pending,
                sale_id: None,
                paid_at: None,
            })
            .collect();

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::SplitConfigured,
            EventPayload::SplitConfigured { groups },
        );

        Ok(vec![event])
    }
}

/// Rules 1 and 2: claims reference real billable items, and per-item
/// claimed quantities match the order quantity exactly.
fn validate_claims(
    snapshot: &TabSnapshot,
    groups: &[SettlementGroupInput],
) -> Result<(), TabError> {
    let mut claimed: HashMap<(u32, u32), i32> = HashMap::new();

    for (group_idx, group) in groups.iter().enumerate() {
        if group.claims.is_empty() {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::EmptySplit,
                format!("Settlement group {} claims no items", group_idx),
            ));
        }
        for claim in &group.claims {
            let item = snapshot
                .item_at(claim.order_idx, claim.item_idx)
                .ok_or(TabError::ItemNotFound {
                    order_idx: claim.order_idx,
                    item_idx: claim.item_idx,
                })?;
            if !item.is_billable() {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::SplitItemCancelled,
                    format!(
                        "Cancelled item '{}' (order {}, item {}) cannot be claimed",
                        item.name, claim.order_idx, claim.item_idx
                    ),
                ));
            }
            if claim.quantity <= 0 {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::InvalidQuantity,
                    format!(
                        "Claim quantity must be positive, got {} (order {}, item {})",
                        claim.quantity, claim.order_idx, claim.item_idx
                    ),
                ));
            }
            *claimed
                .entry((claim.order_idx, claim.item_idx))
                .or_insert(0) += claim.quantity;
        }
    }

    for (order_idx, item_idx, item) in snapshot.indexed_items() {
        if !item.is_billable() {
            continue;
        }
        let total_claimed = claimed.get(&(order_idx, item_idx)).copied().unwrap_or(0);
        if total_claimed < item.quantity {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::SplitItemUnallocated,
                format!(
                    "Item '{}' (order {}, item {}): {} of {} units unallocated",
                    item.name,
                    order_idx,
                    item_idx,
                    item.quantity - total_claimed,
                    item.quantity
                ),
            ));
        }
        if total_claimed > item.quantity {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::SplitItemOverAllocated,
                format!(
                    "Item '{}' (order {}, item {}): {} units claimed for {} ordered",
                    item.name, order_idx, item_idx, total_claimed, item.quantity
                ),
            ));
        }
    }

    Ok(())
}

/// Rule 3: Σ group totals = tab total, two-decimal currency tolerance
fn validate_total_conservation(
    snapshot: &TabSnapshot,
    groups: &[SettlementGroupInput],
) -> Result<(), TabError> {
    let mut sum = Decimal::ZERO;
    for group in groups {
        if !group.total.is_finite() || group.total < 0.0 {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::InvalidAmount,
                format!("Settlement total must be non-negative, got {}", group.total),
            ));
        }
        sum += to_decimal(group.total);
    }

    let tab_total = to_decimal(snapshot.total);
    if (sum - tab_total).abs() > MONEY_TOLERANCE {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::SplitTotalMismatch,
            format!(
                "Settlement totals sum to {:.2}, tab total is {:.2}",
                to_f64(sum),
                snapshot.total
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::money;
    use crate::tabs::storage::TabStorage;
    use crate::tabs::traits::CommandContext;
    use shared::tab::types::{
        AdjustmentKind, Discount, ItemClaim, ItemStatus, LineItem, OrderBatch,
    };

    fn create_test_metadata() -> CommandMetadata {
        CommandMetadata {
            command_id: "cmd-1".to_string(),
            tenant_id: "tenant-1".to_string(),
            operator_id: "op-1".to_string(),
            operator_name: "Ana".to_string(),
            timestamp: 1234567890,
        }
    }

    /// 2×A at 50 + 1×B at 30, 10% discount → total 117
    fn seed_discounted_tab(storage: &TabStorage) {
        let txn = storage.begin_write().unwrap();
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.tenant_id = "tenant-1".to_string();
        snapshot.status = TabStatus::Open;
        snapshot.orders.push(OrderBatch {
            ordered_at: 0,
            items: vec![
                LineItem {
                    product_id: "pA".to_string(),
                    name: "Item A".to_string(),
                    category_name: None,
                    unit_price: 50.0,
                    quantity: 2,
                    note: None,
                    status: ItemStatus::Served,
                    status_log: vec![],
                },
                LineItem {
                    product_id: "pB".to_string(),
                    name: "Item B".to_string(),
                    category_name: None,
                    unit_price: 30.0,
                    quantity: 1,
                    note: None,
                    status: ItemStatus::Served,
                    status_log: vec![],
                },
            ],
        });
        snapshot.discount = Some(Discount {
            kind: AdjustmentKind::Percentage,
            value: 10.0,
            amount: 0.0,
        });
        money::recalculate_totals(&mut snapshot);
        assert_eq!(snapshot.total, 117.0);
        storage.store_snapshot(&txn, &snapshot).unwrap();
        txn.commit().unwrap();
    }

    fn claim(order_idx: u32, item_idx: u32, quantity: i32) -> ItemClaim {
        ItemClaim {
            order_idx,
            item_idx,
            quantity,
        }
    }

    fn group(claims: Vec<ItemClaim>, subtotal: f64, total: f64) -> SettlementGroupInput {
        SettlementGroupInput {
            claims,
            subtotal,
            tip: 0.0,
            total,
        }
    }

    async fn run(
        storage: &TabStorage,
        groups: Vec<SettlementGroupInput>,
    ) -> Result<Vec<TabEvent>, TabError> {
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, storage, 0);
        ConfigureSplitAction {
            tab_id: "tab-1".to_string(),
            groups,
        }
        .execute(&mut ctx, &create_test_metadata())
        .await
    }

    #[tokio::test]
    async fn test_exact_coverage_split_accepted() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        // A×2 carries 90 after its discount share, B×1 carries 27
        let events = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 2)], 100.0, 90.0),
                group(vec![claim(0, 1, 1)], 30.0, 27.0),
            ],
        )
        .await
        .unwrap();

        assert_eq!(events.len(), 1);
        if let EventPayload::SplitConfigured { groups } = &events[0].payload {
            assert_eq!(groups.len(), 2);
            assert_eq!(groups[0].index, 0);
            assert_eq!(groups[0].status, SettlementStatus::Pending);
        } else {
            panic!("Expected SplitConfigured payload");
        }
    }

    #[tokio::test]
    async fn test_quantity_can_split_across_groups() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        // The two units of A go to different payers
        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 1)], 50.0, 45.0),
                group(vec![claim(0, 0, 1), claim(0, 1, 1)], 80.0, 72.0),
            ],
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unallocated_item_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        // Item B is never claimed
        let result = run(&storage, vec![group(vec![claim(0, 0, 2)], 100.0, 117.0)]).await;

        assert!(matches!(
            result,
            Err(TabError::InvalidOperation(
                CommandErrorCode::SplitItemUnallocated,
                _
            ))
        ));
    }

    #[tokio::test]
    async fn test_under_allocated_quantity_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        // Only 1 of 2 units of A claimed
        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 1)], 50.0, 87.0),
                group(vec![claim(0, 1, 1)], 30.0, 30.0),
            ],
        )
        .await;

        assert!(matches!(
            result,
            Err(TabError::InvalidOperation(
                CommandErrorCode::SplitItemUnallocated,
                _
            ))
        ));
    }

    #[tokio::test]
    async fn test_over_allocated_quantity_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 2)], 100.0, 90.0),
                group(vec![claim(0, 0, 1), claim(0, 1, 1)], 80.0, 27.0),
            ],
        )
        .await;

        assert!(matches!(
            result,
            Err(TabError::InvalidOperation(
                CommandErrorCode::SplitItemOverAllocated,
                _
            ))
        ));
    }

    #[tokio::test]
    async fn test_total_mismatch_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        // Coverage is exact but the money does not add up to 117
        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 2)], 100.0, 90.0),
                group(vec![claim(0, 1, 1)], 30.0, 30.0),
            ],
        )
        .await;

        assert!(matches!(
            result,
            Err(TabError::InvalidOperation(
                CommandErrorCode::SplitTotalMismatch,
                _
            ))
        ));
    }

    #[tokio::test]
    async fn test_one_cent_rounding_tolerated() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 2)], 100.0, 90.0),
                group(vec![claim(0, 1, 1)], 30.0, 27.01),
            ],
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_item_reference_rejected() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_discounted_tab(&storage);

        let result = run(
            &storage,
            vec![
                group(vec![claim(0, 0, 2), claim(3, 0, 1)], 100.0, 90.0),
                group(vec![claim(0, 1, 1)], 30.0, 27.0),
            ],
        )
        .await;

        assert!(matches!(result, Err(TabError::ItemNotFound { .. })));
    }
}
