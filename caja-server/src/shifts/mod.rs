//! Shift (turno) lifecycle
//!
//! One open shift per (tenant, store), enforced with a check-and-set in
//! storage. Closing a shift counts the drawer: expected cash is the
//! starting float plus the cash line of the drawer report over the
//! shift's window, and the variance against the counted cash is stored
//! with the shift.

use shared::models::{Shift, ShiftClose, ShiftOpen, ShiftStatus};
use uuid::Uuid;

use crate::drawer::{self, ReportParams};
use crate::tabs::money::{to_decimal, to_f64};
use crate::tabs::storage::TabStorage;
use crate::utils::{AppError, AppResult};

/// Shift lifecycle service
#[derive(Clone)]
pub struct ShiftService {
    storage: TabStorage,
    /// Method name that counts as drawer cash (e.g. "EFECTIVO")
    cash_method: String,
    /// Tax rate handed to the closing drawer report
    tax_rate: f64,
}

impl ShiftService {
    pub fn new(storage: TabStorage, cash_method: impl Into<String>, tax_rate: f64) -> Self {
        Self {
            storage,
            cash_method: cash_method.into(),
            tax_rate,
        }
    }

    /// Open a shift for a store. Fails while another shift is open there.
    pub fn open(&self, tenant_id: &str, req: ShiftOpen) -> AppResult<Shift> {
        if !req.starting_cash.is_finite() || req.starting_cash < 0.0 {
            return Err(AppError::validation(format!(
                "starting cash must be non-negative, got {}",
                req.starting_cash
            )));
        }

        let now = shared::util::now_millis();
        let shift = Shift {
            shift_id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            store_id: req.store_id.clone(),
            operator_id: req.operator_id,
            operator_name: req.operator_name,
            status: ShiftStatus::Open,
            opened_at: now,
            closed_at: None,
            starting_cash: req.starting_cash,
            expected_cash: None,
            actual_cash: None,
            cash_variance: None,
            note: req.note,
            created_at: now,
            updated_at: now,
        };

        if !self.storage.try_open_shift(&shift)? {
            return Err(AppError::conflict(format!(
                "Store {} already has an open shift",
                req.store_id
            )));
        }

        tracing::info!(shift_id = %shift.shift_id, store_id = %shift.store_id, "Shift opened");
        Ok(shift)
    }

    /// Close a shift with cash counting
    pub fn close(&self, tenant_id: &str, shift_id: &str, req: ShiftClose) -> AppResult<Shift> {
        if !req.actual_cash.is_finite() || req.actual_cash < 0.0 {
            return Err(AppError::validation(format!(
                "counted cash must be non-negative, got {}",
                req.actual_cash
            )));
        }

        let mut shift = self.get(tenant_id, shift_id)?;
        if shift.status == ShiftStatus::Closed {
            return Err(AppError::conflict(format!(
                "Shift {} is already closed",
                shift_id
            )));
        }

        let now = shared::util::now_millis();

        // Expected cash = starting float + the cash drawer line so far
        let params = ReportParams {
            start: Some(shift.opened_at),
            end: Some(now),
            shift_id: None,
            store_id: Some(shift.store_id.clone()),
        };
        let report = drawer::build_report(&self.storage, tenant_id, &params, self.tax_rate)?;
        let cash_drawer = report
            .methods
            .iter()
            .find(|m| m.method == self.cash_method)
            .map(|m| m.drawer)
            .unwrap_or(0.0);

        let expected = to_decimal(shift.starting_cash) + to_decimal(cash_drawer);
        shift.status = ShiftStatus::Closed;
        shift.closed_at = Some(now);
        shift.expected_cash = Some(to_f64(expected));
        shift.actual_cash = Some(req.actual_cash);
        shift.cash_variance = Some(to_f64(to_decimal(req.actual_cash) - expected));
        if req.note.is_some() {
            shift.note = req.note;
        }
        shift.updated_at = now;

        self.storage.close_shift(&shift)?;

        tracing::info!(
            shift_id = %shift.shift_id,
            expected = ?shift.expected_cash,
            actual = ?shift.actual_cash,
            variance = ?shift.cash_variance,
            "Shift closed"
        );
        Ok(shift)
    }

    /// The open shift for a store, if any
    pub fn current(&self, tenant_id: &str, store_id: &str) -> AppResult<Option<Shift>> {
        Ok(self.storage.active_shift(tenant_id, store_id)?)
    }

    /// Fetch a shift, hidden from foreign tenants
    pub fn get(&self, tenant_id: &str, shift_id: &str) -> AppResult<Shift> {
        self.storage
            .get_shift(shift_id)?
            .filter(|s| s.tenant_id == tenant_id)
            .ok_or_else(|| AppError::not_found(format!("Shift {} not found", shift_id)))
    }
}
