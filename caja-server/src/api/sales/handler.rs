//! Sales API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::TenantContext;
use crate::core::ServerState;
use crate::payments;
use crate::utils::{time, AppError, AppResult};
use shared::models::{Refund, RefundCreate, Sale};

/// Query params for listing sales by business date
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start_date: String,
    pub end_date: String,
}

/// GET /api/sales?start_date=&end_date= - sales created in the date range
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let tz = state.config.timezone;
    let start = time::day_start_millis(time::parse_date(&query.start_date)?, tz);
    let end = time::day_end_millis(time::parse_date(&query.end_date)?, tz);
    if start >= end {
        return Err(AppError::validation("start_date must precede end_date"));
    }

    let sales = state.storage.sales_in_window(&ctx.tenant_id, start, end)?;
    Ok(Json(sales))
}

/// GET /api/sales/:id - one finalized sale (receipt rendering)
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Sale>> {
    let sale = state
        .storage
        .get_sale(&id)?
        .filter(|s| s.tenant_id == ctx.tenant_id)
        .ok_or_else(|| AppError::not_found(format!("Sale {} not found", id)))?;
    Ok(Json(sale))
}

/// GET /api/sales/:id/refunds - refunds issued against a sale
pub async fn list_refunds(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Refund>>> {
    // Visibility check first; refunds inherit the sale's tenant
    state
        .storage
        .get_sale(&id)?
        .filter(|s| s.tenant_id == ctx.tenant_id)
        .ok_or_else(|| AppError::not_found(format!("Sale {} not found", id)))?;

    Ok(Json(state.storage.refunds_for_sale(&id)?))
}

/// POST /api/sales/:id/refunds - record a refund
pub async fn create_refund(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<RefundCreate>,
) -> AppResult<Json<Refund>> {
    let refund = payments::record_refund(&state.storage, &ctx.tenant_id, &id, req)?;
    Ok(Json(refund))
}

/// POST /api/sales/:id/cancel - void a never-refunded sale
pub async fn cancel(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Sale>> {
    let sale = payments::cancel_sale(&state.storage, &ctx.tenant_id, &id)?;
    Ok(Json(sale))
}
