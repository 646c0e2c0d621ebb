//! Cash-drawer report computation
//!
//! All aggregation happens in Rust over plain range scans, with
//! `rust_decimal` end to end. Every proportional step - mixed-payment
//! scaling, refund distribution, category and discount shares - goes
//! through `money::allocate`, and rounding happens exactly once, when the
//! presentation struct is built. A report either computes fully or the
//! whole call fails; there is no partially-filled result.
//!
//! Window selection preserves the ledger's attribution policy: a completed
//! sale counts by its completion timestamp, a partially-refunded sale by
//! its original creation timestamp, so a sale refunded during a later
//! shift still reports under the shift that transacted it. Do not collapse
//! the two timestamps into one field - that would silently move revenue
//! between reporting periods.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use shared::models::{ExpenseStatus, SaleStatus};

use crate::tabs::money::{allocate, to_decimal, to_f64};
use crate::tabs::storage::TabStorage;
use crate::utils::{AppError, AppResult};

/// Report parameters: an explicit window or a shift, plus an optional
/// store filter
#[derive(Debug, Clone, Default)]
pub struct ReportParams {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub shift_id: Option<String>,
    pub store_id: Option<String>,
}

/// Resolved reporting window (half-open, millis)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: i64,
    pub end: i64,
}

/// Per-method drawer line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodTotal {
    pub method: String,
    /// Post-return sales attributed to this method
    pub sales: f64,
    /// Refunds paid out with this method
    pub refunds: f64,
    /// Approved expenses paid with this method
    pub expenses: f64,
    /// sales − refunds − expenses
    pub drawer: f64,
    /// Number of payment components that hit this method
    pub count: i64,
}

/// Tax back-computation from the post-return sales total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSummary {
    /// Rate as a percentage (e.g. 10 for 10%)
    pub rate: f64,
    /// Net amount (gross / (1 + rate))
    pub net: f64,
    pub tax: f64,
    pub gross: f64,
}

/// Per-category revenue and discount share
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub discount: f64,
}

/// Folio range observed in the window, for receipt-sequence audit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolioRange {
    pub first: u64,
    pub last: u64,
}

/// The balanced cash-drawer report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashDrawerReport {
    pub window: ReportWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    pub methods: Vec<MethodTotal>,
    /// Sales total before returns
    pub gross_sales: f64,
    pub total_returned: f64,
    /// Sales total after returns
    pub net_sales: f64,
    pub expense_total: f64,
    /// Σ per-method drawer amounts
    pub drawer_total: f64,
    pub tax: TaxSummary,
    pub categories: Vec<CategoryTotal>,
    pub sale_count: i64,
    pub cancelled_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folio_range: Option<FolioRange>,
}

#[derive(Default)]
struct MethodAcc {
    sales: Decimal,
    refunds: Decimal,
    expenses: Decimal,
    count: i64,
}

#[derive(Default)]
struct CategoryAcc {
    amount: Decimal,
    discount: Decimal,
}

/// Build the cash-drawer report for a tenant.
///
/// `tax_rate` is a percentage (10 → 10% IVA).
pub fn build_report(
    storage: &TabStorage,
    tenant_id: &str,
    params: &ReportParams,
    tax_rate: f64,
) -> AppResult<CashDrawerReport> {
    let (window, shift_id) = resolve_window(storage, tenant_id, params)?;

    let mut methods: BTreeMap<String, MethodAcc> = BTreeMap::new();
    let mut categories: BTreeMap<String, CategoryAcc> = BTreeMap::new();
    let mut gross_sales = Decimal::ZERO;
    let mut total_returned = Decimal::ZERO;
    let mut net_sales = Decimal::ZERO;
    let mut sale_count = 0i64;
    let mut cancelled_count = 0i64;
    let mut folio_range: Option<FolioRange> = None;

    let candidates = storage.sales_in_window(tenant_id, window.start, window.end)?;
    for sale in candidates {
        if let Some(store) = &params.store_id
            && &sale.store_id != store
        {
            continue;
        }

        // A completed sale counts by completion time; a partially-refunded
        // one by its original creation time (see module docs).
        let selected = match sale.status {
            SaleStatus::Completed => sale.completed_at >= window.start && sale.completed_at < window.end,
            SaleStatus::PartiallyRefunded => {
                sale.created_at >= window.start && sale.created_at < window.end
            }
            SaleStatus::Cancelled => {
                if sale.created_at >= window.start && sale.created_at < window.end {
                    cancelled_count += 1;
                }
                false
            }
        };
        if !selected {
            continue;
        }

        sale_count += 1;
        let total = to_decimal(sale.total);
        let returned = to_decimal(sale.total_returned);
        let net = total - returned;
        gross_sales += total;
        total_returned += returned;
        net_sales += net;

        folio_range = Some(match folio_range {
            None => FolioRange {
                first: sale.folio,
                last: sale.folio,
            },
            Some(range) => FolioRange {
                first: range.first.min(sale.folio),
                last: range.last.max(sale.folio),
            },
        });

        // Per-method sales: single-method sales carry their full net; a
        // mixed sale scales each component by net/total so a partial
        // refund spreads proportionally across the original split.
        if total > Decimal::ZERO {
            let net_ratio = net / total;
            for part in &sale.payments {
                let acc = methods.entry(part.method.clone()).or_default();
                acc.sales += allocate(to_decimal(part.amount), net_ratio);
                acc.count += 1;
            }
        }

        // Refunds are keyed by their own declared methods, which may have
        // nothing to do with the original payment split.
        for refund in storage.refunds_for_sale(&sale.sale_id)? {
            let amount = to_decimal(refund.amount);
            if amount <= Decimal::ZERO {
                continue;
            }
            for part in &refund.payments {
                let ratio = to_decimal(part.amount) / amount;
                methods.entry(part.method.clone()).or_default().refunds +=
                    allocate(amount, ratio);
            }
        }

        // Category breakdown: each item takes its share of the post-return
        // total by (price × quantity) / total; discount shares are taken
        // against the pre-discount figure (total + discount).
        let discount = to_decimal(sale.discount);
        let pre_discount = total + discount;
        for item in &sale.items {
            let line = to_decimal(item.unit_price) * Decimal::from(item.quantity);
            let key = item
                .category_name
                .clone()
                .unwrap_or_else(|| "Sin categoría".to_string());
            let acc = categories.entry(key).or_default();
            if total > Decimal::ZERO {
                acc.amount += allocate(net, line / total);
            }
            if discount > Decimal::ZERO && pre_discount > Decimal::ZERO {
                acc.discount += allocate(discount, line / pre_discount);
            }
        }
    }

    // Approved expenses only; soft-deleted records never reach this point
    let mut expense_total = Decimal::ZERO;
    for expense in storage.expenses_in_window(tenant_id, window.start, window.end)? {
        if expense.status != ExpenseStatus::Approved {
            continue;
        }
        if let Some(store) = &params.store_id
            && &expense.store_id != store
        {
            continue;
        }
        let amount = to_decimal(expense.amount);
        methods.entry(expense.method.clone()).or_default().expenses += amount;
        expense_total += amount;
    }

    let mut drawer_total = Decimal::ZERO;
    let methods: Vec<MethodTotal> = methods
        .into_iter()
        .map(|(method, acc)| {
            let drawer = acc.sales - acc.refunds - acc.expenses;
            drawer_total += drawer;
            MethodTotal {
                method,
                sales: to_f64(acc.sales),
                refunds: to_f64(acc.refunds),
                expenses: to_f64(acc.expenses),
                drawer: to_f64(drawer),
                count: acc.count,
            }
        })
        .collect();

    let categories: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, acc)| CategoryTotal {
            category,
            amount: to_f64(acc.amount),
            discount: to_f64(acc.discount),
        })
        .collect();

    // Prices are tax-inclusive: net = gross / (1 + rate)
    let rate = to_decimal(tax_rate) / Decimal::ONE_HUNDRED;
    let tax_net = net_sales / (Decimal::ONE + rate);
    let tax = TaxSummary {
        rate: tax_rate,
        net: to_f64(tax_net),
        tax: to_f64(net_sales - tax_net),
        gross: to_f64(net_sales),
    };

    Ok(CashDrawerReport {
        window,
        shift_id,
        store_id: params.store_id.clone(),
        methods,
        gross_sales: to_f64(gross_sales),
        total_returned: to_f64(total_returned),
        net_sales: to_f64(net_sales),
        expense_total: to_f64(expense_total),
        drawer_total: to_f64(drawer_total),
        tax,
        categories,
        sale_count,
        cancelled_count,
        folio_range,
    })
}

/// Resolve the reporting window from the parameters: a shift's open/close
/// boundaries, or the explicit range.
fn resolve_window(
    storage: &TabStorage,
    tenant_id: &str,
    params: &ReportParams,
) -> AppResult<(ReportWindow, Option<String>)> {
    if let Some(shift_id) = &params.shift_id {
        let shift = storage
            .get_shift(shift_id)?
            .filter(|s| s.tenant_id == tenant_id)
            .ok_or_else(|| AppError::not_found(format!("Shift {} not found", shift_id)))?;
        let end = shift.closed_at.unwrap_or_else(shared::util::now_millis);
        return Ok((
            ReportWindow {
                start: shift.opened_at,
                end,
            },
            Some(shift.shift_id),
        ));
    }

    match (params.start, params.end) {
        (Some(start), Some(end)) if start < end => Ok((ReportWindow { start, end }, None)),
        (Some(_), Some(_)) => Err(AppError::validation("window start must precede its end")),
        _ => Err(AppError::validation(
            "a report needs either a shift_id or an explicit start and end",
        )),
    }
}
