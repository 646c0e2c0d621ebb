//! Refund recording and sale cancellation
//!
//! Refunds are new immutable records referencing the original sale, never
//! edits. The only fields a refund touches on the sale are the bookkeeping
//! trio (`total_returned`, `status`, `updated_at`), and that mutation
//! commits in the same transaction as the refund insert.

use rust_decimal::Decimal;
use shared::models::{Refund, RefundCreate, Sale, SaleStatus};
use uuid::Uuid;

use crate::tabs::money::{round_money, to_decimal, to_f64};
use crate::tabs::storage::TabStorage;
use crate::utils::{AppError, AppResult};

/// Record a refund against a finalized sale.
///
/// The refund declares its own method split, independent of how the sale
/// was originally paid: a card sale may be refunded in cash. Components
/// must sum to the refund amount exactly.
pub fn record_refund(
    storage: &TabStorage,
    tenant_id: &str,
    sale_id: &str,
    req: RefundCreate,
) -> AppResult<Refund> {
    let mut sale = load_tenant_sale(storage, tenant_id, sale_id)?;

    if sale.status == SaleStatus::Cancelled {
        return Err(AppError::conflict(format!(
            "Sale {} is cancelled and cannot be refunded",
            sale_id
        )));
    }

    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(AppError::validation(format!(
            "refund amount must be positive, got {}",
            req.amount
        )));
    }

    let remaining = to_decimal(sale.total) - to_decimal(sale.total_returned);
    if to_decimal(req.amount) > remaining {
        return Err(AppError::validation(format!(
            "refund amount {:.2} exceeds refundable remainder {:.2}",
            req.amount,
            to_f64(remaining)
        )));
    }

    if req.payments.is_empty() {
        return Err(AppError::validation(
            "refund requires at least one method component",
        ));
    }
    let mut sum = Decimal::ZERO;
    for part in &req.payments {
        if !part.amount.is_finite() || part.amount <= 0.0 {
            return Err(AppError::validation(format!(
                "refund component must be positive, got {}",
                part.amount
            )));
        }
        if part.method.trim().is_empty() {
            return Err(AppError::validation("refund method must not be empty"));
        }
        sum += to_decimal(part.amount);
    }
    if round_money(sum) != round_money(to_decimal(req.amount)) {
        return Err(AppError::validation(format!(
            "refund components sum to {:.2}, expected {:.2}",
            to_f64(sum),
            req.amount
        )));
    }

    // Returned items must exist on the sale, within the sold quantity
    for returned in &req.items {
        let sold = sale
            .items
            .iter()
            .find(|i| i.product_id == returned.product_id)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "returned item {} was not part of sale {}",
                    returned.product_id, sale_id
                ))
            })?;
        if returned.quantity <= 0 || returned.quantity > sold.quantity {
            return Err(AppError::validation(format!(
                "returned quantity {} for item {} exceeds sold quantity {}",
                returned.quantity, returned.product_id, sold.quantity
            )));
        }
    }

    let now = shared::util::now_millis();
    let refund = Refund {
        refund_id: Uuid::new_v4().to_string(),
        tenant_id: tenant_id.to_string(),
        store_id: sale.store_id.clone(),
        sale_id: sale_id.to_string(),
        amount: req.amount,
        payments: req.payments,
        items: req.items,
        reason: req.reason,
        created_at: now,
    };

    sale.total_returned = to_f64(to_decimal(sale.total_returned) + to_decimal(req.amount));
    sale.status = SaleStatus::PartiallyRefunded;
    sale.updated_at = now;

    storage.store_refund(&refund, &sale)?;

    tracing::info!(
        sale_id = %sale_id,
        refund_id = %refund.refund_id,
        amount = refund.amount,
        "Refund recorded"
    );

    Ok(refund)
}

/// Cancel a finalized sale. Only a completed, never-refunded sale can be
/// cancelled; the record stays in place and the reconciler counts it
/// without including it in any monetary total.
pub fn cancel_sale(storage: &TabStorage, tenant_id: &str, sale_id: &str) -> AppResult<Sale> {
    let mut sale = load_tenant_sale(storage, tenant_id, sale_id)?;

    match sale.status {
        SaleStatus::Completed => {}
        SaleStatus::Cancelled => {
            return Err(AppError::conflict(format!(
                "Sale {} is already cancelled",
                sale_id
            )));
        }
        SaleStatus::PartiallyRefunded => {
            return Err(AppError::conflict(format!(
                "Sale {} has refunds and cannot be cancelled",
                sale_id
            )));
        }
    }

    sale.status = SaleStatus::Cancelled;
    sale.updated_at = shared::util::now_millis();

    let txn = storage.begin_write()?;
    storage.update_sale(&txn, &sale)?;
    txn.commit().map_err(crate::tabs::storage::StorageError::from)?;

    tracing::info!(sale_id = %sale_id, "Sale cancelled");
    Ok(sale)
}

/// Fetch a sale and hide it from foreign tenants (not-found, not forbidden)
fn load_tenant_sale(storage: &TabStorage, tenant_id: &str, sale_id: &str) -> AppResult<Sale> {
    let sale = storage
        .get_sale(sale_id)?
        .ok_or_else(|| AppError::not_found(format!("Sale {} not found", sale_id)))?;
    if sale.tenant_id != tenant_id {
        return Err(AppError::not_found(format!("Sale {} not found", sale_id)));
    }
    Ok(sale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::SaleItem;
    use shared::tab::types::{PaymentPart, PaymentType};

    fn seed_sale(storage: &TabStorage, total: f64) -> Sale {
        let now = shared::util::now_millis();
        let sale = Sale {
            sale_id: "sale-1".to_string(),
            tenant_id: "t1".to_string(),
            store_id: "store-1".to_string(),
            shift_id: "shift-1".to_string(),
            folio: 1,
            receipt_number: "FAC1".to_string(),
            tab_id: "tab-1".to_string(),
            settlement_index: None,
            status: SaleStatus::Completed,
            payment_type: PaymentType::Single,
            payments: vec![PaymentPart {
                method: "TARJETA".to_string(),
                amount: total,
            }],
            items: vec![SaleItem {
                product_id: "pA".to_string(),
                name: "Item A".to_string(),
                category_name: None,
                unit_price: total,
                quantity: 1,
            }],
            subtotal: total,
            discount: 0.0,
            tip: 0.0,
            total,
            total_returned: 0.0,
            created_at: now,
            completed_at: now,
            updated_at: now,
        };
        let txn = storage.begin_write().unwrap();
        storage.store_sale(&txn, &sale).unwrap();
        txn.commit().unwrap();
        sale
    }

    fn refund_req(amount: f64, method: &str) -> RefundCreate {
        RefundCreate {
            amount,
            payments: vec![PaymentPart {
                method: method.to_string(),
                amount,
            }],
            items: vec![],
            reason: None,
        }
    }

    #[test]
    fn test_refund_method_independent_of_original() {
        let storage = TabStorage::open_in_memory().unwrap();
        let original = seed_sale(&storage, 100.0);

        // Card sale refunded in cash
        let refund = record_refund(&storage, "t1", "sale-1", refund_req(30.0, "EFECTIVO")).unwrap();
        assert_eq!(refund.payments[0].method, "EFECTIVO");

        let sale = storage.get_sale("sale-1").unwrap().unwrap();
        assert_eq!(sale.status, SaleStatus::PartiallyRefunded);
        assert_eq!(sale.total_returned, 30.0);
        assert_eq!(sale.net_total(), 70.0);
        // Creation/completion timestamps untouched - window attribution never moves
        assert_eq!(sale.created_at, original.created_at);
        assert_eq!(sale.completed_at, original.completed_at);
    }

    #[test]
    fn test_refund_cannot_exceed_remainder() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_sale(&storage, 100.0);

        record_refund(&storage, "t1", "sale-1", refund_req(80.0, "EFECTIVO")).unwrap();
        let err = record_refund(&storage, "t1", "sale-1", refund_req(30.0, "EFECTIVO"));
        assert!(err.is_err());
        // Exactly the remainder is fine
        record_refund(&storage, "t1", "sale-1", refund_req(20.0, "EFECTIVO")).unwrap();
    }

    #[test]
    fn test_refund_components_must_sum_to_amount() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_sale(&storage, 100.0);

        let req = RefundCreate {
            amount: 30.0,
            payments: vec![
                PaymentPart {
                    method: "EFECTIVO".to_string(),
                    amount: 10.0,
                },
                PaymentPart {
                    method: "TARJETA".to_string(),
                    amount: 15.0,
                },
            ],
            items: vec![],
            reason: None,
        };
        assert!(record_refund(&storage, "t1", "sale-1", req).is_err());
    }

    #[test]
    fn test_foreign_tenant_sees_not_found() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_sale(&storage, 100.0);

        let err = record_refund(&storage, "t2", "sale-1", refund_req(10.0, "EFECTIVO"));
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_cancel_only_untouched_sales() {
        let storage = TabStorage::open_in_memory().unwrap();
        seed_sale(&storage, 100.0);

        record_refund(&storage, "t1", "sale-1", refund_req(10.0, "EFECTIVO")).unwrap();
        assert!(cancel_sale(&storage, "t1", "sale-1").is_err());

        let storage2 = TabStorage::open_in_memory().unwrap();
        seed_sale(&storage2, 50.0);
        let sale = cancel_sale(&storage2, "t1", "sale-1").unwrap();
        assert_eq!(sale.status, SaleStatus::Cancelled);
        // Cancelling twice conflicts
        assert!(cancel_sale(&storage2, "t1", "sale-1").is_err());
    }
}
