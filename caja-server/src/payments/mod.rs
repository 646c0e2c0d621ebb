//! Payment finalization
//!
//! - [`recorder`] - builds the immutable sale record for a tab or
//!   settlement group; the single place where a tab's outcome becomes
//!   durable and auditable
//! - [`refunds`] - refund records against finalized sales, plus sale
//!   cancellation

pub mod recorder;
pub mod refunds;

pub use recorder::{build_settlement_sale, build_tab_sale};
pub use refunds::{cancel_sale, record_refund};
