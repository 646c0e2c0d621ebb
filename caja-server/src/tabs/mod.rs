//! Tab Ledger - event-sourced tab lifecycle
//!
//! - **manager**: core TabsManager for command processing
//! - **storage**: redb persistence for events, snapshots, indices and the
//!   finalized ledger (sales, refunds, expenses, shifts)
//! - **actions**: one validating handler per command
//! - **appliers**: pure event folds shared by live processing and replay
//! - **reducer**: replay and drift verification
//! - **money**: Decimal arithmetic, validation, the shared allocator
//!
//! # Data Flow
//!
//! 1. A handler receives a TabCommand with the resolved tenant context
//! 2. TabsManager validates it through the matching action
//! 3. TabEvents are generated with global sequence numbers
//! 4. Appliers fold the events into the staged snapshot
//! 5. Events, snapshot, indices and any finalized sale commit atomically
//! 6. The CommandResponse goes back to the caller

pub mod actions;
pub mod traits;
pub mod appliers;
pub mod manager;
pub mod money;
pub mod reducer;
pub mod storage;

// Re-exports
pub use manager::TabsManager;
pub use storage::TabStorage;

// Re-export shared types for convenience
pub use shared::tab::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, TabCommand, TabCommandPayload,
    TabEvent, TabEventType, TabSnapshot, TabStatus,
};
