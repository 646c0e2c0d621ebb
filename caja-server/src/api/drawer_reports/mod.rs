//! Cash-drawer report API module

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/drawer-reports", get(handler::get_report))
}
