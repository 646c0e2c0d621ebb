//! Payment recorder - converts a settled tab or settlement group into an
//! immutable finalized sale record
//!
//! The returned `Sale` is staged into the command's transaction by the pay
//! actions, so the paying event and the sale record commit atomically.
//! Item name/price/quantity are snapshotted from the tab, which already
//! captured them at order time - nothing here reads the live catalog.

use shared::models::{Sale, SaleItem, SaleStatus};
use shared::tab::types::{CommandErrorCode, SettlementGroup, Tender};
use shared::tab::TabSnapshot;
use uuid::Uuid;

use crate::tabs::money::{self, to_decimal, to_f64};
use crate::tabs::traits::TabError;

/// Build the sale for a whole (unsplit) tab.
///
/// The tender must cover the tab total exactly; mixed components are
/// validated with exact currency-precision equality.
pub fn build_tab_sale(snapshot: &TabSnapshot, tender: &Tender) -> Result<Sale, TabError> {
    if snapshot.total <= 0.0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("tab total must be positive, got {:.2}", snapshot.total),
        ));
    }
    let payments = money::validate_tender(tender, snapshot.total)?;

    let items: Vec<SaleItem> = snapshot
        .indexed_items()
        .filter(|(_, _, item)| item.is_billable())
        .map(|(_, _, item)| SaleItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            category_name: item.category_name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
        })
        .collect();

    let now = shared::util::now_millis();
    Ok(Sale {
        sale_id: Uuid::new_v4().to_string(),
        tenant_id: snapshot.tenant_id.clone(),
        store_id: snapshot.store_id.clone(),
        shift_id: snapshot.shift_id.clone(),
        folio: snapshot.folio,
        receipt_number: snapshot.receipt_number.clone(),
        tab_id: snapshot.tab_id.clone(),
        settlement_index: None,
        status: SaleStatus::Completed,
        payment_type: tender.payment_type(),
        payments,
        items,
        subtotal: snapshot.subtotal,
        discount: snapshot.discount.as_ref().map(|d| d.amount).unwrap_or(0.0),
        tip: snapshot.tip.amount,
        total: snapshot.total,
        total_returned: 0.0,
        created_at: now,
        completed_at: now,
        updated_at: now,
    })
}

/// Build the sale for one settlement group of a split tab.
///
/// The group's own total is the payment target. The group total already
/// embodies its share of the tab-level discount (split validation enforces
/// Σ group totals = tab total), so the implied discount share is
/// `subtotal + tip − total`, clamped at zero.
pub fn build_settlement_sale(
    snapshot: &TabSnapshot,
    group: &SettlementGroup,
    tender: &Tender,
) -> Result<Sale, TabError> {
    if group.total <= 0.0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!(
                "settlement total must be positive, got {:.2}",
                group.total
            ),
        ));
    }
    let payments = money::validate_tender(tender, group.total)?;

    let mut items = Vec::with_capacity(group.claims.len());
    for claim in &group.claims {
        let item = snapshot
            .item_at(claim.order_idx, claim.item_idx)
            .ok_or(TabError::ItemNotFound {
                order_idx: claim.order_idx,
                item_idx: claim.item_idx,
            })?;
        items.push(SaleItem {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            category_name: item.category_name.clone(),
            unit_price: item.unit_price,
            quantity: claim.quantity,
        });
    }

    let implied_discount =
        (to_decimal(group.subtotal) + to_decimal(group.tip) - to_decimal(group.total))
            .max(rust_decimal::Decimal::ZERO);

    let now = shared::util::now_millis();
    Ok(Sale {
        sale_id: Uuid::new_v4().to_string(),
        tenant_id: snapshot.tenant_id.clone(),
        store_id: snapshot.store_id.clone(),
        shift_id: snapshot.shift_id.clone(),
        folio: snapshot.folio,
        receipt_number: snapshot.receipt_number.clone(),
        tab_id: snapshot.tab_id.clone(),
        settlement_index: Some(group.index),
        status: SaleStatus::Completed,
        payment_type: tender.payment_type(),
        payments,
        items,
        subtotal: group.subtotal,
        discount: to_f64(implied_discount),
        tip: group.tip,
        total: group.total,
        total_returned: 0.0,
        created_at: now,
        completed_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::tab::types::{
        Discount, AdjustmentKind, ItemClaim, ItemStatus, LineItem, OrderBatch, PaymentPart,
        PaymentType, SettlementStatus,
    };

    fn paid_tab() -> TabSnapshot {
        let mut snapshot = TabSnapshot::new("tab-1".to_string());
        snapshot.tenant_id = "t1".to_string();
        snapshot.store_id = "store-1".to_string();
        snapshot.shift_id = "shift-1".to_string();
        snapshot.folio = 12;
        snapshot.receipt_number = "FAC2026080610012".to_string();
        snapshot.orders.push(OrderBatch {
            ordered_at: 0,
            items: vec![
                LineItem {
                    product_id: "pA".to_string(),
                    name: "Item A".to_string(),
                    category_name: Some("Platos".to_string()),
                    unit_price: 50.0,
                    quantity: 2,
                    note: None,
                    status: ItemStatus::Served,
                    status_log: vec![],
                },
                LineItem {
                    product_id: "pB".to_string(),
                    name: "Item B".to_string(),
                    category_name: Some("Bebidas".to_string()),
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
        crate::tabs::money::recalculate_totals(&mut snapshot);
        snapshot
    }

    #[test]
    fn test_tab_sale_snapshots_items_and_totals() {
        let snapshot = paid_tab();
        assert_eq!(snapshot.total, 117.0);

        let sale = build_tab_sale(
            &snapshot,
            &Tender::Single {
                method: "EFECTIVO".to_string(),
            },
        )
        .unwrap();

        assert_eq!(sale.total, 117.0);
        assert_eq!(sale.discount, 13.0);
        assert_eq!(sale.payment_type, PaymentType::Single);
        assert_eq!(sale.payments.len(), 1);
        assert_eq!(sale.payments[0].method, "EFECTIVO");
        assert_eq!(sale.payments[0].amount, 117.0);
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.folio, 12);
        assert_eq!(sale.created_at, sale.completed_at);
        assert_eq!(sale.status, SaleStatus::Completed);
    }

    #[test]
    fn test_tab_sale_mixed_components_must_sum_exactly() {
        let snapshot = paid_tab();

        let ok = Tender::Mixed {
            parts: vec![
                PaymentPart {
                    method: "EFECTIVO".to_string(),
                    amount: 70.0,
                },
                PaymentPart {
                    method: "TARJETA".to_string(),
                    amount: 47.0,
                },
            ],
        };
        assert!(build_tab_sale(&snapshot, &ok).is_ok());

        let short = Tender::Mixed {
            parts: vec![
                PaymentPart {
                    method: "EFECTIVO".to_string(),
                    amount: 70.0,
                },
                PaymentPart {
                    method: "TARJETA".to_string(),
                    amount: 40.0,
                },
            ],
        };
        assert!(build_tab_sale(&snapshot, &short).is_err());
    }

    #[test]
    fn test_settlement_sale_scopes_items_to_claims() {
        let snapshot = paid_tab();
        let group = SettlementGroup {
            index: 0,
            claims: vec![ItemClaim {
                order_idx: 0,
                item_idx: 0,
                quantity: 2,
            }],
            subtotal: 100.0,
            tip: 0.0,
            total: 90.0,
            status: SettlementStatus::Pending,
            sale_id: None,
            paid_at: None,
        };

        let sale = build_settlement_sale(
            &snapshot,
            &group,
            &Tender::Single {
                method: "TARJETA".to_string(),
            },
        )
        .unwrap();

        assert_eq!(sale.settlement_index, Some(0));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].product_id, "pA");
        assert_eq!(sale.items[0].quantity, 2);
        // Implied discount share: 100 + 0 − 90
        assert_eq!(sale.discount, 10.0);
        assert_eq!(sale.total, 90.0);
    }
}
