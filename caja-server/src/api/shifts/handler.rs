//! Shift API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::TenantContext;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{Shift, ShiftClose, ShiftOpen};

/// POST /api/shifts - open a shift for a store
pub async fn open(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(payload): Json<ShiftOpen>,
) -> AppResult<Json<Shift>> {
    Ok(Json(state.shifts.open(&ctx.tenant_id, payload)?))
}

#[derive(Debug, Deserialize)]
pub struct CurrentQuery {
    pub store_id: String,
}

/// GET /api/shifts/current?store_id= - the open shift, if any
pub async fn current(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<CurrentQuery>,
) -> AppResult<Json<Shift>> {
    state
        .shifts
        .current(&ctx.tenant_id, &query.store_id)?
        .map(Json)
        .ok_or_else(|| {
            AppError::not_found(format!("No open shift for store {}", query.store_id))
        })
}

/// GET /api/shifts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Shift>> {
    Ok(Json(state.shifts.get(&ctx.tenant_id, &id)?))
}

/// POST /api/shifts/:id/close - close with cash counting
pub async fn close(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(payload): Json<ShiftClose>,
) -> AppResult<Json<Shift>> {
    Ok(Json(state.shifts.close(&ctx.tenant_id, &id, payload)?))
}
