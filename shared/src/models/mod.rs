//! Finalized ledger models
//!
//! Records produced by the engine once money has actually moved:
//! sales, refunds, expenses, plus the shift (turno) and catalog product
//! models the engine consumes.

pub mod expense;
pub mod product;
pub mod refund;
pub mod sale;
pub mod shift;

pub use expense::{Expense, ExpenseCreate, ExpenseStatus};
pub use product::{Product, ProductUpsert};
pub use refund::{Refund, RefundCreate};
pub use sale::{Sale, SaleItem, SaleStatus};
pub use shift::{Shift, ShiftClose, ShiftOpen, ShiftStatus};
