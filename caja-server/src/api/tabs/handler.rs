//! Tab API handlers
//!
//! Thin adapters: build a TabCommand from the request and the tenant
//! context, run it through the manager, and answer with the refreshed
//! snapshot. Clients may pass their own `command_id` to make transport
//! retries safe; without one the server generates it.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::api::TenantContext;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::tab::types::{
    AdjustmentKind, ItemStatus, OrderItemInput, SettlementGroupInput, TableRef, Tender, TipKind,
};
use shared::tab::{TabCommand, TabCommandPayload, TabEvent, TabSnapshot};

/// Run an OpenTab command and return the new tab's snapshot
fn run_open_command(
    state: &ServerState,
    ctx: &TenantContext,
    command_id: Option<String>,
    payload: TabCommandPayload,
) -> AppResult<TabSnapshot> {
    let mut cmd = TabCommand::new(
        ctx.tenant_id.clone(),
        ctx.operator_id.clone(),
        ctx.operator_name.clone(),
        payload,
    );
    if let Some(command_id) = command_id {
        cmd.command_id = command_id;
    }

    let response = state.manager.execute_command(cmd);
    if !response.success {
        let error = response
            .error
            .ok_or_else(|| AppError::internal("command failed without error detail"))?;
        return Err(error.into());
    }

    let tab_id = response
        .tab_id
        .ok_or_else(|| AppError::conflict("command was already processed"))?;

    state
        .manager
        .get_snapshot(&ctx.tenant_id, &tab_id)
        .map_err(|e| AppError::internal(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Tab {} not found", tab_id)))
}

/// Run a command against an existing tab and answer with its refreshed
/// snapshot. Duplicate (already processed) commands fall through to the
/// snapshot fetch, so retries observe the committed state.
fn run_tab_command(
    state: &ServerState,
    ctx: &TenantContext,
    tab_id: &str,
    command_id: Option<String>,
    payload: TabCommandPayload,
) -> AppResult<TabSnapshot> {
    let mut cmd = TabCommand::new(
        ctx.tenant_id.clone(),
        ctx.operator_id.clone(),
        ctx.operator_name.clone(),
        payload,
    );
    if let Some(command_id) = command_id {
        cmd.command_id = command_id;
    }

    let response = state.manager.execute_command(cmd);
    if !response.success {
        let error = response
            .error
            .ok_or_else(|| AppError::internal("command failed without error detail"))?;
        return Err(error.into());
    }

    state
        .manager
        .get_snapshot(&ctx.tenant_id, tab_id)
        .map_err(|e| AppError::internal(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Tab {} not found", tab_id)))
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OpenTabRequest {
    pub store_id: String,
    pub tables: Vec<TableRef>,
    pub server_id: String,
    pub server_name: String,
    pub guest_count: i32,
    pub note: Option<String>,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderRequest {
    pub items: Vec<OrderItemInput>,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemStatusRequest {
    pub order_idx: u32,
    pub item_idx: u32,
    pub status: ItemStatus,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub kind: AdjustmentKind,
    pub value: f64,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TipRequest {
    pub kind: TipKind,
    pub value: f64,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CancelRequest {
    pub reason: Option<String>,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CloseRequest {
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfigureSplitRequest {
    pub groups: Vec<SettlementGroupInput>,
    pub command_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub tender: Tender,
    pub command_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/tabs - active tabs of the tenant
pub async fn list_active(
    State(state): State<ServerState>,
    ctx: TenantContext,
) -> AppResult<Json<Vec<TabSnapshot>>> {
    let tabs = state
        .manager
        .get_active_tabs(&ctx.tenant_id)
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok(Json(tabs))
}

/// GET /api/tabs/:id - one tab snapshot
pub async fn get_by_id(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = state
        .manager
        .get_snapshot(&ctx.tenant_id, &id)
        .map_err(|e| AppError::internal(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Tab {} not found", id)))?;
    Ok(Json(snapshot))
}

/// GET /api/tabs/:id/events - the tab's audit trail
pub async fn events(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TabEvent>>> {
    let events = state
        .manager
        .get_events(&ctx.tenant_id, &id)
        .map_err(|e| AppError::internal(e.to_string()))?;
    if events.is_empty() {
        return Err(AppError::not_found(format!("Tab {} not found", id)));
    }
    Ok(Json(events))
}

/// POST /api/tabs - open a tab
pub async fn open(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Json(req): Json<OpenTabRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_open_command(
        &state,
        &ctx,
        req.command_id,
        TabCommandPayload::OpenTab {
            store_id: req.store_id,
            tables: req.tables,
            server_id: req.server_id,
            server_name: req.server_name,
            guest_count: req.guest_count,
            note: req.note,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/orders - append an order batch
pub async fn add_order(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<AddOrderRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::AddOrder {
            tab_id: id.clone(),
            items: req.items,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/items/status - advance an item's kitchen status
pub async fn update_item_status(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<UpdateItemStatusRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::UpdateItemStatus {
            tab_id: id.clone(),
            order_idx: req.order_idx,
            item_idx: req.item_idx,
            status: req.status,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/discount
pub async fn apply_discount(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<DiscountRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::ApplyDiscount {
            tab_id: id.clone(),
            kind: req.kind,
            value: req.value,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/tip
pub async fn apply_tip(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<TipRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::ApplyTip {
            tab_id: id.clone(),
            kind: req.kind,
            value: req.value,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/close - bring the check
pub async fn close(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<CloseRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::CloseTab { tab_id: id.clone() },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<CancelRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::CancelTab {
            tab_id: id.clone(),
            reason: req.reason,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/split - configure the settlement groups
pub async fn configure_split(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<ConfigureSplitRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::ConfigureSplit {
            tab_id: id.clone(),
            groups: req.groups,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/split/:index/pay - settle one group
pub async fn pay_settlement(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path((id, index)): Path<(String, u32)>,
    Json(req): Json<PayRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::PaySettlement {
            tab_id: id.clone(),
            group_index: index,
            tender: req.tender,
        },
    )?;
    Ok(Json(snapshot))
}

/// POST /api/tabs/:id/pay - pay the whole tab
pub async fn pay(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Path(id): Path<String>,
    Json(req): Json<PayRequest>,
) -> AppResult<Json<TabSnapshot>> {
    let snapshot = run_tab_command(
        &state,
        &ctx,
        &id,
        req.command_id,
        TabCommandPayload::PayTab {
            tab_id: id.clone(),
            tender: req.tender,
        },
    )?;
    Ok(Json(snapshot))
}
