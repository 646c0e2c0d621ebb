//! Shift API module (turnos)

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::open))
        .route("/current", get(handler::current))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/close", post(handler::close))
}
