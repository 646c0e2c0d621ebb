//! Expense record
//!
//! Expenses go through a separate approval workflow; only approved,
//! non-deleted expenses participate in cash-drawer reconciliation.

use serde::{Deserialize, Serialize};

/// Expense approval status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    InReview,
    Denied,
}

/// Expense record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub expense_id: i64,
    pub tenant_id: String,
    pub store_id: String,
    pub description: String,
    pub amount: f64,
    /// Payment method the expense was paid with
    pub method: String,
    pub status: ExpenseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<i64>,
    /// Explicit soft-delete marker. Every read path filters on this;
    /// there is no implicit query interception.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl Expense {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Expense creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub store_id: String,
    pub description: String,
    pub amount: f64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
