//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - HTTP-level error handling
//! - [`logger`] - tracing setup
//! - [`time`] - business-timezone conversions

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
