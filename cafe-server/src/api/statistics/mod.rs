//! Sales Statistics API Module
//!
//! Aggregations over archived orders for the back-office dashboard.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Statistics router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/statistics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/most-sold", get(handler::most_sold))
        .route("/monthly-sales", get(handler::monthly_sales))
}
