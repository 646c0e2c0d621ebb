//! Refund record (return)
//!
//! A refund references a finalized sale and carries its own method split,
//! independent of how the original sale was paid.

use crate::tab::types::PaymentPart;
use serde::{Deserialize, Serialize};

use super::sale::SaleItem;

/// Immutable refund record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub refund_id: String,
    pub tenant_id: String,
    pub store_id: String,
    /// The sale this refund is issued against
    pub sale_id: String,
    /// Refunded amount (≤ sale.total − prior refunds)
    pub amount: f64,
    /// Method split of the money given back. Sums to `amount` exactly;
    /// may differ entirely from the original payment's split.
    pub payments: Vec<PaymentPart>,
    /// The specific items being returned
    pub items: Vec<SaleItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: i64,
}

/// Refund creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundCreate {
    pub amount: f64,
    pub payments: Vec<PaymentPart>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
