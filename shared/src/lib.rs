//! Shared types for the Caja engine
//!
//! Common types used across the server and its clients:
//! - `tab`: the tab event-sourcing vocabulary (commands, events, snapshots)
//! - `models`: finalized ledger records (sales, refunds, expenses, shifts)
//! - `util`: timestamp and ID helpers

pub mod models;
pub mod tab;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
