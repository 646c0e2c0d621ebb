//! Expense records and their approval workflow
//!
//! Expenses enter as `Pending` and move through review to `Approved` or
//! `Denied`; only approved, non-deleted expenses reach the cash-drawer
//! report. Deletion is an explicit `deleted_at` marker - every read path
//! filters it, never a query layer behind the caller's back.

use shared::models::{Expense, ExpenseCreate, ExpenseStatus};

use crate::tabs::storage::TabStorage;
use crate::utils::{AppError, AppResult};

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    storage: TabStorage,
}

impl ExpenseService {
    pub fn new(storage: TabStorage) -> Self {
        Self { storage }
    }

    /// Record a new expense as Pending
    pub fn create(&self, tenant_id: &str, req: ExpenseCreate) -> AppResult<Expense> {
        if !req.amount.is_finite() || req.amount <= 0.0 {
            return Err(AppError::validation(format!(
                "expense amount must be positive, got {}",
                req.amount
            )));
        }
        if req.method.trim().is_empty() {
            return Err(AppError::validation("expense method must not be empty"));
        }
        if req.description.trim().is_empty() {
            return Err(AppError::validation("expense description must not be empty"));
        }

        let now = shared::util::now_millis();
        let expense = Expense {
            expense_id: shared::util::snowflake_id(),
            tenant_id: tenant_id.to_string(),
            store_id: req.store_id,
            description: req.description,
            amount: req.amount,
            method: req.method,
            status: ExpenseStatus::Pending,
            note: req.note,
            created_at: now,
            updated_at: now,
            approved_at: None,
            deleted_at: None,
        };
        self.storage.store_expense(&expense)?;
        Ok(expense)
    }

    /// Move an expense through its approval workflow.
    /// Approved and Denied are final.
    pub fn set_status(
        &self,
        tenant_id: &str,
        expense_id: i64,
        status: ExpenseStatus,
    ) -> AppResult<Expense> {
        let mut expense = self.get(tenant_id, expense_id)?;

        let allowed = matches!(
            (expense.status, status),
            (ExpenseStatus::Pending, ExpenseStatus::InReview)
                | (ExpenseStatus::Pending, ExpenseStatus::Approved)
                | (ExpenseStatus::Pending, ExpenseStatus::Denied)
                | (ExpenseStatus::InReview, ExpenseStatus::Approved)
                | (ExpenseStatus::InReview, ExpenseStatus::Denied)
        );
        if !allowed {
            return Err(AppError::conflict(format!(
                "Expense {} cannot move from {:?} to {:?}",
                expense_id, expense.status, status
            )));
        }

        let now = shared::util::now_millis();
        expense.status = status;
        expense.updated_at = now;
        if status == ExpenseStatus::Approved {
            expense.approved_at = Some(now);
        }
        self.storage.store_expense(&expense)?;
        Ok(expense)
    }

    /// Soft-delete an expense
    pub fn delete(&self, tenant_id: &str, expense_id: i64) -> AppResult<Expense> {
        let mut expense = self.get(tenant_id, expense_id)?;
        let now = shared::util::now_millis();
        expense.deleted_at = Some(now);
        expense.updated_at = now;
        self.storage.store_expense(&expense)?;
        Ok(expense)
    }

    /// Expenses created in `[start, end)` (deleted ones filtered in storage)
    pub fn list(&self, tenant_id: &str, start: i64, end: i64) -> AppResult<Vec<Expense>> {
        Ok(self.storage.expenses_in_window(tenant_id, start, end)?)
    }

    /// Fetch one expense; deleted or foreign records answer not-found
    pub fn get(&self, tenant_id: &str, expense_id: i64) -> AppResult<Expense> {
        self.storage
            .get_expense(expense_id)?
            .filter(|e| e.tenant_id == tenant_id && !e.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Expense {} not found", expense_id)))
    }
}
