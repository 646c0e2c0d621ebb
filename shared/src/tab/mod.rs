//! Tab Event Sourcing Module
//!
//! This module provides types for the tab event sourcing system:
//! - Commands: requests from clients to modify tabs
//! - Events: immutable facts recorded after command processing
//! - Snapshots: computed tab state from the event stream

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{TabCommand, TabCommandPayload};
pub use event::{EventPayload, TabEvent, TabEventType};
pub use snapshot::{StatusChange, TabSnapshot, TabStatus};
pub use types::*;
