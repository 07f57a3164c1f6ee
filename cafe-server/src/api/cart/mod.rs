//! Cart API Module
//!
//! Mutations always target the caller's unique active cart.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Cart router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Active cart
        .route("/", get(handler::get_cart).delete(handler::clear))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{product_id}",
            patch(handler::update_item).delete(handler::remove_item),
        )
        // Closed cart history + reorder
        .route("/history", get(handler::history))
        .route("/reorder/{cart_id}", post(handler::reorder))
}
