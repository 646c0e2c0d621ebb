//! Shared types for tab event sourcing

use serde::{Deserialize, Serialize};

// ============================================================================
// Table / Item Types
// ============================================================================

/// Reference to a dining table held by a tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableRef {
    pub table_id: String,
    pub table_name: String,
}

/// Kitchen status of a single line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl ItemStatus {
    /// Whether the item can no longer change status
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Served | ItemStatus::Cancelled)
    }

    /// Forward progression: pending → preparing → ready → served,
    /// with cancelled reachable from any non-terminal state.
    pub fn can_transition_to(&self, target: ItemStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match target {
            ItemStatus::Cancelled => true,
            ItemStatus::Preparing => matches!(self, ItemStatus::Pending),
            ItemStatus::Ready => matches!(self, ItemStatus::Preparing),
            ItemStatus::Served => matches!(self, ItemStatus::Ready),
            ItemStatus::Pending => false,
        }
    }
}

/// One status transition of a line item, with server timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemStatusStamp {
    pub status: ItemStatus,
    pub timestamp: i64,
}

/// Line item snapshot - price captured at order time, immutable afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Catalog product ID
    pub product_id: String,
    /// Product name snapshot
    pub name: String,
    /// Category name snapshot (for statistics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Unit price captured at order time
    pub unit_price: f64,
    /// Quantity (≥1)
    pub quantity: i32,
    /// Item note
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Kitchen status
    #[serde(default)]
    pub status: ItemStatus,
    /// Status transition log (append-only)
    #[serde(default)]
    pub status_log: Vec<ItemStatusStamp>,
}

impl LineItem {
    /// Whether this item counts toward the subtotal
    pub fn is_billable(&self) -> bool {
        self.status != ItemStatus::Cancelled
    }
}

/// One timestamped batch of line items (a "round" of ordering)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderBatch {
    pub ordered_at: i64,
    pub items: Vec<LineItem>,
}

/// Item input for adding an order batch (price comes from the catalog)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Adjustments (discount / tip)
// ============================================================================

/// Discount type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentKind {
    Percentage,
    Fixed,
}

/// Tab-level discount. `amount` is the computed currency value,
/// recalculated from `kind`/`value` on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discount {
    pub kind: AdjustmentKind,
    pub value: f64,
    #[serde(default)]
    pub amount: f64,
}

/// Tip type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipKind {
    #[default]
    None,
    Percentage,
    Fixed,
}

/// Tab-level tip. Percentage tips are computed against the subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Tip {
    pub kind: TipKind,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub amount: f64,
}

// ============================================================================
// Tender / Payments
// ============================================================================

/// One (method, amount) component of a payment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentPart {
    pub method: String,
    pub amount: f64,
}

/// Payment classification on a finalized record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Single,
    Mixed,
}

/// Tender offered for a tab or settlement group.
///
/// A single tender implies the full target amount; a mixed tender must
/// list components that sum to the target exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tender {
    Single { method: String },
    Mixed { parts: Vec<PaymentPart> },
}

impl Tender {
    pub fn payment_type(&self) -> PaymentType {
        match self {
            Tender::Single { .. } => PaymentType::Single,
            Tender::Mixed { .. } => PaymentType::Mixed,
        }
    }
}

// ============================================================================
// Split Settlement Types
// ============================================================================

/// Claim of `quantity` units of the item at (order_idx, item_idx)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ItemClaim {
    pub order_idx: u32,
    pub item_idx: u32,
    pub quantity: i32,
}

/// Settlement group input for configuring a split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementGroupInput {
    pub claims: Vec<ItemClaim>,
    pub subtotal: f64,
    #[serde(default)]
    pub tip: f64,
    pub total: f64,
}

/// Settlement payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Paid,
}

/// One settlement group of a split tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementGroup {
    /// Ordered index within the split configuration
    pub index: u32,
    pub claims: Vec<ItemClaim>,
    pub subtotal: f64,
    pub tip: f64,
    pub total: f64,
    #[serde(default)]
    pub status: SettlementStatus,
    /// Finalized sale this group produced (set when paid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
}

// ============================================================================
// Command Response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// New tab ID (only for OpenTab command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, tab_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            tab_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            tab_id: None,
            error: Some(error),
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            tab_id: None,
            error: None,
        }
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Error classes callers can branch on ("bad input" vs "stale view of state")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    StateConflict,
    ResourceConflict,
    NotFound,
    Internal,
}

/// Command error codes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    // Not found
    TabNotFound,
    ItemNotFound,
    SettlementNotFound,
    ProductNotFound,

    // Validation
    InvalidAmount,
    InvalidQuantity,
    InvalidDiscount,
    InvalidTip,
    InvalidItemStatus,
    EmptyOrder,
    EmptySplit,
    SplitItemUnallocated,
    SplitItemOverAllocated,
    SplitItemCancelled,
    SplitTotalMismatch,
    MixedPaymentMismatch,

    // State conflict
    TabAlreadyPaid,
    TabAlreadyCancelled,
    TabNotOpen,
    TabIsSplit,
    SplitLocked,
    SettlementAlreadyPaid,
    IncompatibleStatus,

    // Resource conflict
    TableOccupied,
    NoActiveShift,
    FolioCollision,

    // Infrastructure (storage classification)
    DuplicateCommand,
    StorageFull,
    OutOfMemory,
    StorageCorrupted,
    SystemBusy,
    InternalError,
}

impl CommandErrorCode {
    /// Classify the code so transport layers can map it uniformly
    pub fn class(&self) -> ErrorClass {
        use CommandErrorCode::*;
        match self {
            TabNotFound | ItemNotFound | SettlementNotFound | ProductNotFound => {
                ErrorClass::NotFound
            }
            InvalidAmount | InvalidQuantity | InvalidDiscount | InvalidTip
            | InvalidItemStatus | EmptyOrder | EmptySplit | SplitItemUnallocated
            | SplitItemOverAllocated | SplitItemCancelled | SplitTotalMismatch
            | MixedPaymentMismatch => {
                ErrorClass::Validation
            }
            TabAlreadyPaid | TabAlreadyCancelled | TabNotOpen | TabIsSplit | SplitLocked
            | SettlementAlreadyPaid | IncompatibleStatus => ErrorClass::StateConflict,
            TableOccupied | NoActiveShift | FolioCollision => ErrorClass::ResourceConflict,
            DuplicateCommand | StorageFull | OutOfMemory | StorageCorrupted | SystemBusy
            | InternalError => ErrorClass::Internal,
        }
    }
}
