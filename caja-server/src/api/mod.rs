//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`tabs`] - tab lifecycle commands and snapshots
//! - [`sales`] - finalized sales, refunds, cancellation
//! - [`expenses`] - expense records and approval transitions
//! - [`shifts`] - shift open/close
//! - [`drawer_reports`] - cash-drawer reconciliation
//! - [`products`] - catalog cache seeding
//!
//! Every tenant-scoped handler takes a [`TenantContext`], extracted from
//! the identity headers the upstream auth middleware injects. The values
//! are trusted as pre-validated; this core performs no authentication.

use axum::{extract::FromRequestParts, http::request::Parts, Router};

use crate::core::ServerState;
use crate::utils::AppError;

pub mod drawer_reports;
pub mod expenses;
pub mod health;
pub mod products;
pub mod sales;
pub mod shifts;
pub mod tabs;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Resolved tenant/operator identity, injected upstream
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub tenant_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub role: String,
}

impl FromRequestParts<ServerState> for TenantContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse if a middleware already resolved it
        if let Some(ctx) = parts.extensions.get::<TenantContext>() {
            return Ok(ctx.clone());
        }

        let header = |name: &str| -> Option<String> {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
        };

        let tenant_id = header("x-tenant-id")
            .ok_or_else(|| AppError::validation("missing tenant context (x-tenant-id)"))?;
        let operator_id = header("x-operator-id")
            .ok_or_else(|| AppError::validation("missing operator context (x-operator-id)"))?;
        let operator_name = header("x-operator-name").unwrap_or_else(|| operator_id.clone());
        let role = header("x-role").unwrap_or_else(|| "cashier".to_string());

        let ctx = TenantContext {
            tenant_id,
            operator_id,
            operator_name,
            role,
        };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

/// Assemble the full API router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(tabs::router())
        .merge(sales::router())
        .merge(expenses::router())
        .merge(shifts::router())
        .merge(drawer_reports::router())
        .merge(products::router())
        .with_state(state)
}
