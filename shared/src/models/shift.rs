//! Shift model (turno)

use serde::{Deserialize, Serialize};

/// Shift status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftStatus {
    #[default]
    Open,
    Closed,
}

/// Shift record - a cashier's open-to-close working period, used as the
/// default reconciliation window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub shift_id: String,
    pub tenant_id: String,
    pub store_id: String,
    /// Operator employee ID
    pub operator_id: String,
    /// Operator display name
    pub operator_name: String,
    pub status: ShiftStatus,
    /// Shift start time (Unix millis)
    pub opened_at: i64,
    /// Shift end time, None while still open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    /// Starting cash amount in the drawer
    pub starting_cash: f64,
    /// Expected cash at close (starting + cash movements), set at close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_cash: Option<f64>,
    /// Actual cash counted at close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cash: Option<f64>,
    /// Cash variance (actual − expected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Open shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOpen {
    pub store_id: String,
    pub operator_id: String,
    pub operator_name: String,
    /// Starting cash amount (default 0)
    #[serde(default)]
    pub starting_cash: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Close shift payload (with cash counting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftClose {
    /// Actual cash counted
    pub actual_cash: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
