//! Caja Server - order & payment reconciliation engine for a multi-tenant POS
//!
//! # Architecture overview
//!
//! The transactional core is event-sourced: a command is validated by an
//! action which emits immutable events; appliers fold events into the tab
//! snapshot; events, snapshots, indices and any finalized sale commit in a
//! single storage transaction.
//!
//! # Module structure
//!
//! ```text
//! caja-server/src/
//! ├── core/          # Config, state, HTTP bootstrap
//! ├── api/           # HTTP routes and handlers
//! ├── catalog/       # Product metadata cache (price snapshot source)
//! ├── tabs/          # Tab ledger event sourcing (storage, manager, actions, appliers)
//! ├── payments/      # Payment recorder and refunds
//! ├── expenses/      # Expense records and approval transitions
//! ├── shifts/        # Shift (turno) lifecycle
//! ├── drawer/        # Cash-drawer reconciliation reports
//! └── utils/         # Errors, logging, time helpers
//! ```

pub mod api;
pub mod catalog;
pub mod core;
pub mod drawer;
pub mod expenses;
pub mod payments;
pub mod shifts;
pub mod tabs;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use tabs::{TabStorage, TabsManager};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
