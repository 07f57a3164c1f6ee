//! Customer Order API Module
//!
//! Checkout plus the customer-driven lifecycle actions (cancel,
//! confirm delivery). Every route is scoped to the caller's own orders.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Customer order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/checkout", post(handler::checkout))
        .route("/", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/confirm-delivery", post(handler::confirm_delivery))
}
