//! Admin Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::order::OrderStatus;

use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::utils::AppResult;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List all orders (paginated)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// Body for a status override
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Force an order into a new status (terminal orders are frozen)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let order = state.lifecycle.update_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// Body for a courier position update
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Push the courier's live position for an in-flight order
pub async fn update_location(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLocationRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .lifecycle
        .update_admin_location(&id, &payload.coordinates)
        .await?;
    Ok(Json(order))
}

#[derive(Debug, Serialize)]
pub struct PendingCountResponse {
    pub count: u64,
}

/// Point-in-time pending-order count (authoritative state for
/// reconnecting dashboards)
pub async fn pending_count(
    State(state): State<ServerState>,
) -> AppResult<Json<PendingCountResponse>> {
    let count = state.pending().get_pending_count().await?;
    Ok(Json(PendingCountResponse { count }))
}
