//! Customer Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::CallerIdentity;
use crate::core::ServerState;
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::orders::CheckoutRequest;
use crate::utils::{AppError, AppResult};

/// Convert the caller's active cart into an order
pub async fn checkout(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let order = state.checkout.checkout(&user_id, payload).await?;
    Ok(Json(order))
}

/// The caller's orders, newest first
pub async fn list_mine(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_user(&user_id).await?;
    Ok(Json(orders))
}

/// One of the caller's orders
pub async fn get_by_id(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = load_own_order(&state, &user_id, &id).await?;
    Ok(Json(order))
}

/// Cancel the caller's order (only while Pending or Preparing)
pub async fn cancel(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    load_own_order(&state, &user_id, &id).await?;
    let order = state.lifecycle.cancel(&id).await?;
    Ok(Json(order))
}

/// Confirm receipt of an Out-for-Delivery order
pub async fn confirm_delivery(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    load_own_order(&state, &user_id, &id).await?;
    let order = state.lifecycle.confirm_delivery(&id).await?;
    Ok(Json(order))
}

/// Ownership check: a foreign order id is indistinguishable from a
/// missing one
async fn load_own_order(state: &ServerState, user_id: &str, id: &str) -> AppResult<Order> {
    let repo = OrderRepository::new(state.db.clone());
    repo.find_by_id(id)
        .await?
        .filter(|o| o.user_id == user_id)
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))
}
