//! Product catalog handlers
//!
//! The catalog of record is an external collaborator; these endpoints
//! seed and refresh the in-memory cache the engine snapshots prices from.

use axum::{extract::State, Json};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{Product, ProductUpsert};

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.list()))
}

/// POST /api/products - insert or replace one product
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<ProductUpsert>,
) -> AppResult<Json<Product>> {
    if payload.product_id.trim().is_empty() {
        return Err(AppError::validation("product_id must not be empty"));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::validation(format!(
            "price must be non-negative, got {}",
            payload.price
        )));
    }
    Ok(Json(state.catalog.upsert(payload)))
}
