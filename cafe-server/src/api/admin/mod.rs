//! Admin Order API Module
//!
//! Back-office routes: order queue, status overrides, courier tracking,
//! pending count. Authorization happens at the upstream gateway.

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

/// Admin router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/pending-count", get(handler::pending_count))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/location", patch(handler::update_location))
}
