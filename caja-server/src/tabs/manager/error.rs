use super::super::storage::StorageError;
use super::super::traits::TabError;
use shared::tab::types::{CommandError, CommandErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Tab not found: {0}")]
    TabNotFound(String),

    #[error("Tab already paid: {0}")]
    TabAlreadyPaid(String),

    #[error("Tab already cancelled: {0}")]
    TabAlreadyCancelled(String),

    #[error("Item not found: order {0}, item {1}")]
    ItemNotFound(u32, u32),

    #[error("Settlement group not found: {0}")]
    SettlementNotFound(u32),

    #[error("Table is already occupied: {0}")]
    TableOccupied(String),

    #[error("No active shift for store: {0}")]
    NoActiveShift(String),

    #[error("{1}")]
    InvalidOperation(CommandErrorCode, String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Classify storage failures into error codes (clients localize the message)
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    match e {
        StorageError::Serialization(_) => return CommandErrorCode::InternalError,
        StorageError::TabNotFound(_) => return CommandErrorCode::TabNotFound,
        StorageError::SaleNotFound(_) => return CommandErrorCode::InternalError,
        _ => {}
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc") {
        return CommandErrorCode::StorageFull;
    }
    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                let message = e.to_string();
                tracing::error!(error = %message, error_code = ?code, "Storage error occurred");
                (code, message)
            }
            ManagerError::TabNotFound(id) => (
                CommandErrorCode::TabNotFound,
                format!("Tab not found: {}", id),
            ),
            ManagerError::TabAlreadyPaid(id) => (
                CommandErrorCode::TabAlreadyPaid,
                format!("Tab already paid: {}", id),
            ),
            ManagerError::TabAlreadyCancelled(id) => (
                CommandErrorCode::TabAlreadyCancelled,
                format!("Tab already cancelled: {}", id),
            ),
            ManagerError::ItemNotFound(order_idx, item_idx) => (
                CommandErrorCode::ItemNotFound,
                format!("Item not found: order {}, item {}", order_idx, item_idx),
            ),
            ManagerError::SettlementNotFound(idx) => (
                CommandErrorCode::SettlementNotFound,
                format!("Settlement group not found: {}", idx),
            ),
            ManagerError::TableOccupied(msg) => (CommandErrorCode::TableOccupied, msg),
            ManagerError::NoActiveShift(store) => (
                CommandErrorCode::NoActiveShift,
                format!("No active shift for store: {}", store),
            ),
            ManagerError::InvalidOperation(code, msg) => (code, msg),
            ManagerError::Internal(msg) => (CommandErrorCode::InternalError, msg),
        };
        CommandError::new(code, message)
    }
}

impl From<TabError> for ManagerError {
    fn from(err: TabError) -> Self {
        match err {
            TabError::TabNotFound(id) => ManagerError::TabNotFound(id),
            TabError::TabAlreadyPaid(id) => ManagerError::TabAlreadyPaid(id),
            TabError::TabAlreadyCancelled(id) => ManagerError::TabAlreadyCancelled(id),
            TabError::ItemNotFound {
                order_idx,
                item_idx,
            } => ManagerError::ItemNotFound(order_idx, item_idx),
            TabError::SettlementNotFound(idx) => ManagerError::SettlementNotFound(idx),
            TabError::TableOccupied(msg) => ManagerError::TableOccupied(msg),
            TabError::NoActiveShift(store) => ManagerError::NoActiveShift(store),
            TabError::InvalidOperation(code, msg) => ManagerError::InvalidOperation(code, msg),
            TabError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
