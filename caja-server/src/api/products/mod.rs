//! Product catalog API module (cache seeding)

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/products", get(handler::list).post(handler::upsert))
}
