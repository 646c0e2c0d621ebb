//! Cash-drawer report handler

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::api::TenantContext;
use crate::core::ServerState;
use crate::drawer::{self, CashDrawerReport, ReportParams};
use crate::utils::{time, AppResult};

/// Report query: either a shift or an explicit date range, with an
/// optional store filter
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub shift_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub store_id: Option<String>,
}

/// GET /api/drawer-reports?{shift_id | start_date&end_date}[&store_id]
pub async fn get_report(
    State(state): State<ServerState>,
    ctx: TenantContext,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<CashDrawerReport>> {
    let tz = state.config.timezone;

    let start = query
        .start_date
        .as_deref()
        .map(|d| time::parse_date(d).map(|d| time::day_start_millis(d, tz)))
        .transpose()?;
    let end = query
        .end_date
        .as_deref()
        .map(|d| time::parse_date(d).map(|d| time::day_end_millis(d, tz)))
        .transpose()?;

    let params = ReportParams {
        start,
        end,
        shift_id: query.shift_id,
        store_id: query.store_id,
    };

    let report = drawer::build_report(
        &state.storage,
        &ctx.tenant_id,
        &params,
        state.config.tax_rate,
    )?;
    Ok(Json(report))
}
