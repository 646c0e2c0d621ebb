//! Tab API module

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tabs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_active).post(handler::open))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/events", get(handler::events))
        .route("/{id}/orders", post(handler::add_order))
        .route("/{id}/items/status", post(handler::update_item_status))
        .route("/{id}/discount", post(handler::apply_discount))
        .route("/{id}/tip", post(handler::apply_tip))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/split", post(handler::configure_split))
        .route("/{id}/split/{index}/pay", post(handler::pay_settlement))
        .route("/{id}/pay", post(handler::pay))
}
