//! Expense API handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::TenantContext;
use crate::core::ServerState;
use crate::utils::{time, AppError, AppResult};
use shared::models::{Expense, ExpenseCreate, ExpenseStatus};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub start_date: String,
    pub end_date: String,
}

/// GET /api/expenses?start_date=&end_date=
pub async fn list(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let tz = state.config.timezone;
    let start = time::day_start_millis(time::parse_date(&query.start_date)?, tz);
    let end = time::day_end_millis(time::parse_date(&query.end_date)?, tz);
    if start >= end {
        return Err(AppError::validation("start_date must precede end_date"));
    }
    Ok(Json(state.expenses.list(&ctx.tenant_id, start, end)?))
}

/// GET /api/expenses/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    Ok(Json(state.expenses.get(&ctx.tenant_id, id)?))
}

/// POST /api/expenses
pub async fn create(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    Ok(Json(state.expenses.create(&ctx.tenant_id, payload)?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ExpenseStatus,
}

/// PUT /api/expenses/:id/status - approval workflow transition
pub async fn set_status(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Expense>> {
    Ok(Json(state.expenses.set_status(
        &ctx.tenant_id,
        id,
        payload.status,
    )?))
}

/// DELETE /api/expenses/:id - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.expenses.delete(&ctx.tenant_id, id)?;
    Ok(Json(true))
}
