//! Order Model
//!
//! Created once by checkout from a cart snapshot. Immutable afterwards
//! except for `status`, `payment_status` and `admin_location`; line
//! items never change post-creation and orders are never deleted, only
//! transitioned to a terminal status.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::{GeoPoint, OrderLineItem, OrderStatus, PaymentMethod, PaymentStatus, PurchaseType};
use surrealdb::RecordId;

/// Persisted order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub items: Vec<OrderLineItem>,
    /// Sum of line totals, snapshotted at creation for the analytics
    /// aggregations
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub purchase_type: PurchaseType,
    /// Required for Delivery, absent for Dine-In
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<GeoPoint>,
    /// Optional free-text address supplied by the customer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_address: Option<String>,
    /// Courier position pushed by the back office for live tracking
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_location: Option<GeoPoint>,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// Recompute the line-total sum (used at creation; `total` is the
    /// persisted snapshot)
    pub fn compute_total(items: &[OrderLineItem]) -> f64 {
        items.iter().map(|i| i.line_total()).sum()
    }
}
