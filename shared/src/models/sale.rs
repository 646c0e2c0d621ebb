//! Finalized payment record (sale)
//!
//! A sale is created once when a tab or settlement group is paid and is
//! immutable afterwards, except for the refund bookkeeping fields
//! (`status`, `total_returned`, `updated_at`) which refunds maintain.
//! Refunds themselves are separate records, never edits.

use crate::tab::types::{PaymentPart, PaymentType};
use serde::{Deserialize, Serialize};

/// Sale status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    Completed,
    PartiallyRefunded,
    Cancelled,
}

/// Item snapshot carried by a sale - decoupled from the live catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleItem {
    pub product_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub unit_price: f64,
    pub quantity: i32,
}

/// Finalized payment record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub sale_id: String,
    pub tenant_id: String,
    pub store_id: String,
    pub shift_id: String,
    /// Folio of the originating tab (audit cross-check against the
    /// physical receipt sequence)
    pub folio: u64,
    pub receipt_number: String,
    /// Originating tab
    pub tab_id: String,
    /// Settlement group index when the sale settles a split group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_index: Option<u32>,
    pub status: SaleStatus,
    pub payment_type: PaymentType,
    /// One entry for a single-method sale, several for mixed.
    /// Component amounts always sum to `total` exactly.
    pub payments: Vec<PaymentPart>,
    /// Item snapshot at time of sale
    pub items: Vec<SaleItem>,
    pub subtotal: f64,
    pub discount: f64,
    pub tip: f64,
    pub total: f64,
    /// Cumulative refunded amount (maintained by refund records)
    #[serde(default)]
    pub total_returned: f64,
    /// Original creation timestamp. Drives window selection for
    /// partially-refunded sales so they stay attributed to the shift in
    /// which they were transacted.
    pub created_at: i64,
    /// Completion timestamp. Drives window selection for completed sales.
    pub completed_at: i64,
    /// Bumped by refund bookkeeping only
    pub updated_at: i64,
}

impl Sale {
    /// Net amount after refunds
    pub fn net_total(&self) -> f64 {
        (self.total - self.total_returned).max(0.0)
    }
}
