//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for storage/serialization. Proportional distribution (refunds,
//! discounts, mixed-payment components) always goes through [`allocate`] so
//! rounding behaves identically everywhere it is used.

use rust_decimal::prelude::*;
use shared::tab::types::{
    AdjustmentKind, CommandErrorCode, OrderItemInput, PaymentPart, Tender, TipKind,
};
use shared::tab::TabSnapshot;

use super::traits::TabError;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed price per item
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal (NaN/Infinity collapse to zero; callers validate first)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal to f64, rounded to currency precision
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a Decimal to currency precision (presentation only)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Distribute `amount` by `ratio` at undivided precision.
///
/// The single allocation primitive used by the reconciler for
/// sales-per-method, refunds-per-method and the category/discount
/// breakdowns. No rounding happens here; callers round once, at the edge.
pub fn allocate(amount: Decimal, ratio: Decimal) -> Decimal {
    amount * ratio
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), TabError> {
    if !value.is_finite() {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

// ============================================================================
// Input validation
// ============================================================================

/// Validate an order item input before snapshotting
pub fn validate_order_item(item: &OrderItemInput) -> Result<(), TabError> {
    if item.quantity <= 0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!("quantity must be positive, got {}", item.quantity),
        ));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidQuantity,
            format!(
                "quantity exceeds maximum allowed ({}), got {}",
                MAX_QUANTITY, item.quantity
            ),
        ));
    }
    Ok(())
}

/// Validate a catalog price before it becomes an immutable snapshot
pub fn validate_price(price: f64) -> Result<(), TabError> {
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("price must be non-negative, got {}", price),
        ));
    }
    if price > MAX_PRICE {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidAmount,
            format!("price exceeds maximum allowed ({}), got {}", MAX_PRICE, price),
        ));
    }
    Ok(())
}

/// Validate a discount: non-negative, finite, percentage bounded at 100
pub fn validate_discount(kind: AdjustmentKind, value: f64) -> Result<(), TabError> {
    require_finite(value, "discount value")?;
    if value < 0.0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidDiscount,
            format!("discount must be non-negative, got {}", value),
        ));
    }
    if kind == AdjustmentKind::Percentage && value > 100.0 {
        return Err(TabError::InvalidOperation(
            CommandErrorCode::InvalidDiscount,
            format!("percentage discount must not exceed 100, got {}", value),
        ));
    }
    Ok(())
}

/// Validate a tip: finite, non-negative, percentage bounded at 100
pub fn validate_tip(kind: TipKind, value: f64) -> Result<(), TabError> {
    require_finite(value, "tip value")?;
    match kind {
        TipKind::None => Ok(()),
        TipKind::Percentage => {
            if !(0.0..=100.0).contains(&value) {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::InvalidTip,
                    format!("percentage tip must be between 0 and 100, got {}", value),
                ));
            }
            Ok(())
        }
        TipKind::Fixed => {
            if value < 0.0 {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::InvalidTip,
                    format!("tip must be non-negative, got {}", value),
                ));
            }
            Ok(())
        }
    }
}

/// Validate a tender against a target total and normalize it into
/// payment parts.
///
/// A single tender implies the full target. Mixed components must be
/// positive, finite, and sum to the target with EXACT currency-precision
/// equality - not tolerance - so a €70 + €40 submission against €117 is
/// rejected even though each part alone is valid.
pub fn validate_tender(tender: &Tender, total: f64) -> Result<Vec<PaymentPart>, TabError> {
    match tender {
        Tender::Single { method } => {
            if method.trim().is_empty() {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::InvalidAmount,
                    "payment method must not be empty".to_string(),
                ));
            }
            Ok(vec![PaymentPart {
                method: method.clone(),
                amount: total,
            }])
        }
        Tender::Mixed { parts } => {
            if parts.is_empty() {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::MixedPaymentMismatch,
                    "mixed payment requires at least one component".to_string(),
                ));
            }
            let mut sum = Decimal::ZERO;
            for part in parts {
                require_finite(part.amount, "payment amount")?;
                if part.amount <= 0.0 {
                    return Err(TabError::InvalidOperation(
                        CommandErrorCode::InvalidAmount,
                        format!("payment amount must be positive, got {}", part.amount),
                    ));
                }
                if part.amount > MAX_PAYMENT_AMOUNT {
                    return Err(TabError::InvalidOperation(
                        CommandErrorCode::InvalidAmount,
                        format!(
                            "payment amount exceeds maximum allowed ({}), got {}",
                            MAX_PAYMENT_AMOUNT, part.amount
                        ),
                    ));
                }
                if part.method.trim().is_empty() {
                    return Err(TabError::InvalidOperation(
                        CommandErrorCode::InvalidAmount,
                        "payment method must not be empty".to_string(),
                    ));
                }
                sum += to_decimal(part.amount);
            }
            if round_money(sum) != round_money(to_decimal(total)) {
                return Err(TabError::InvalidOperation(
                    CommandErrorCode::MixedPaymentMismatch,
                    format!(
                        "mixed payment components sum to {:.2}, expected {:.2}",
                        to_f64(sum),
                        total
                    ),
                ));
            }
            Ok(parts.clone())
        }
    }
}

// ============================================================================
// Totals
// ============================================================================

/// Recompute subtotal, discount amount, tip amount and total from scratch.
///
/// Stored totals are never mutated directly anywhere else: every applier
/// that touches items or adjustments ends with this call, so the stored
/// total always equals the recomputed value. Cancelled items are excluded
/// from the subtotal; percentage tips are computed against the subtotal,
/// not the discounted total; a fixed discount larger than the subtotal
/// clamps to it.
pub fn recalculate_totals(snapshot: &mut TabSnapshot) {
    let mut subtotal = Decimal::ZERO;
    for batch in &snapshot.orders {
        for item in &batch.items {
            if item.is_billable() {
                subtotal += to_decimal(item.unit_price) * Decimal::from(item.quantity);
            }
        }
    }

    let discount_amount = match &snapshot.discount {
        Some(d) => {
            let raw = match d.kind {
                AdjustmentKind::Percentage => {
                    subtotal * to_decimal(d.value) / Decimal::ONE_HUNDRED
                }
                AdjustmentKind::Fixed => to_decimal(d.value),
            };
            raw.min(subtotal)
        }
        None => Decimal::ZERO,
    };

    let tip_amount = match snapshot.tip.kind {
        TipKind::None => Decimal::ZERO,
        TipKind::Percentage => subtotal * to_decimal(snapshot.tip.value) / Decimal::ONE_HUNDRED,
        TipKind::Fixed => to_decimal(snapshot.tip.value),
    };

    snapshot.subtotal = to_f64(subtotal);
    if let Some(d) = &mut snapshot.discount {
        d.amount = to_f64(discount_amount);
    }
    snapshot.tip.amount = to_f64(tip_amount);
    snapshot.total = to_f64(subtotal - discount_amount + tip_amount);
}
