//! Event payloads pushed over the notifier
//!
//! Shapes are part of the client contract; field names stay camelCase
//! to match what the storefront and dashboard already consume.

use serde::{Deserialize, Serialize};

use crate::order::{GeoPoint, OrderLineItem, OrderStatus, PurchaseType};

/// `new-order` payload: enough for the dashboard to render the queue
/// entry without an extra round trip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderPayload {
    pub order_id: String,
    pub user_id: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<GeoPoint>,
    pub items: Vec<OrderLineItem>,
    pub purchase_type: PurchaseType,
}

/// `order-status-changed` payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangedPayload {
    pub order_id: String,
    pub new_status: OrderStatus,
}

/// `pending-orders-updated` payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingCountPayload {
    pub count: u64,
}
