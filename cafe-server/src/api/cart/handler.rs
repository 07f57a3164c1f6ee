//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::api::CallerIdentity;
use crate::core::ServerState;
use crate::db::models::Cart;
use crate::utils::AppResult;

/// Body for adding an item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

/// Body for changing a line item quantity
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// Get the caller's active cart (null when none exists)
pub async fn get_cart(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
) -> AppResult<Json<Option<Cart>>> {
    let cart = state.cart.get_active_cart(&user_id).await?;
    Ok(Json(cart))
}

/// Add a product to the active cart (created on demand)
pub async fn add_item(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(payload): Json<AddItemRequest>,
) -> AppResult<Json<Cart>> {
    let cart = state
        .cart
        .add_item(&user_id, &payload.product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

/// Set the quantity of an existing line item
pub async fn update_item(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<Cart>> {
    let cart = state
        .cart
        .update_item_quantity(&user_id, &product_id, payload.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove a line item
pub async fn remove_item(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(product_id): Path<String>,
) -> AppResult<Json<Cart>> {
    let cart = state.cart.remove_item(&user_id, &product_id).await?;
    Ok(Json(cart))
}

/// Closed cart history, newest first
pub async fn history(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
) -> AppResult<Json<Vec<Cart>>> {
    let carts = state.cart.list_history(&user_id).await?;
    Ok(Json(carts))
}

#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub merged: usize,
}

/// Merge a closed cart back into the active cart
pub async fn reorder(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(cart_id): Path<String>,
) -> AppResult<Json<ReorderResponse>> {
    let merged = state
        .cart
        .reorder_from_historical_cart(&user_id, &cart_id)
        .await?;
    Ok(Json(ReorderResponse { merged }))
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: bool,
}

/// Delete the active cart row entirely
pub async fn clear(
    State(state): State<ServerState>,
    CallerIdentity(user_id): CallerIdentity,
) -> AppResult<Json<ClearResponse>> {
    let deleted = state.cart.clear(&user_id).await?;
    Ok(Json(ClearResponse { deleted }))
}
