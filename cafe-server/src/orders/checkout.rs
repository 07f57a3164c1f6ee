//! CheckoutOrchestrator - cart to order conversion
//!
//! # Checkout Flow
//!
//! ```text
//! checkout(user, request)
//!     ├─ 1. Validate purchase-type fields (before any write)
//!     ├─ 2. Acquire per-user checkout lock
//!     ├─ 3. Atomically claim + close the active cart (conditional update)
//!     ├─ 4. Snapshot cart line items into order line items
//!     ├─ 5. Persist the order (initial status = Pending)
//!     ├─ 6. Release lock
//!     ├─ 7. Lifecycle hook: broadcast new-order, refresh pending count
//!     └─ 8. Return the created order
//! ```
//!
//! Atomicity contract: of two concurrent checkouts for the same user,
//! the second observes "no active cart" (the first closed it) and fails
//! cleanly with `EmptyCart` - it can never double-snapshot the same
//! line items. The per-user lock is shared with the cart service, so a
//! cart write cannot slip in between the claim and a compensating
//! reactivation; the conditional close is the store-level claim. If
//! order persistence fails after the claim, the cart is reactivated so
//! no state is lost.

use super::{LifecycleEngine, OrderError, OrderResult, UserLocks};
use crate::db::models::Order;
use crate::db::repository::{CartRepository, OrderRepository};
use serde::Deserialize;
use shared::order::{
    GeoPoint, OrderLineItem, OrderStatus, PaymentMethod, PaymentStatus, PurchaseType,
};
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

/// Raw delivery location as the storefront sends it
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryLocationInput {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Checkout surface contract
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    pub purchase_type: PurchaseType,
    pub delivery_location: Option<DeliveryLocationInput>,
    #[validate(length(max = 500))]
    pub manual_address: Option<String>,
}

#[derive(Clone)]
pub struct CheckoutOrchestrator {
    carts: CartRepository,
    orders: OrderRepository,
    lifecycle: Arc<LifecycleEngine>,
    /// Per-user mutual exclusion around the claim-snapshot-persist
    /// unit, shared with the cart service
    locks: UserLocks,
}

impl CheckoutOrchestrator {
    pub fn new(db: Surreal<Db>, lifecycle: Arc<LifecycleEngine>, locks: UserLocks) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            lifecycle,
            locks,
        }
    }

    /// Convert the user's active cart into a persisted order
    pub async fn checkout(&self, user_id: &str, request: CheckoutRequest) -> OrderResult<Order> {
        // 1. Validation - rejected before any persistence write
        let delivery_location = Self::validate_location(&request)?;

        // 2. Per-user lock around claim + persist; cart mutations take
        // the same lock
        let _guard = self.locks.acquire(user_id).await;

        // 3. Atomic claim: the conditional close is a single
        // read-modify-write, so a concurrent second checkout sees no
        // active cart
        let cart = self
            .carts
            .close_active(user_id)
            .await?
            .ok_or(OrderError::EmptyCart)?;

        if cart.is_empty() {
            // Claimed an empty cart - reopen it and reject
            self.reactivate_best_effort(&cart.id_string()).await;
            return Err(OrderError::EmptyCart);
        }

        // 4. Snapshot line items (price and name copied now, never
        // re-derived from the catalog)
        let items: Vec<OrderLineItem> = cart.items.iter().map(OrderLineItem::from).collect();
        let total = Order::compute_total(&items);

        let payment_status = if request.payment_method.is_prepaid() {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        };

        let now = chrono::Utc::now().to_rfc3339();
        let order = Order {
            id: None,
            user_id: user_id.to_string(),
            items,
            total,
            status: OrderStatus::Pending,
            payment_method: request.payment_method,
            payment_status,
            purchase_type: request.purchase_type,
            delivery_location,
            manual_address: request.manual_address.clone(),
            admin_location: None,
            created_at: now.clone(),
            updated_at: now,
        };

        // 5. Persist; on failure reopen the claimed cart so the user
        // loses nothing
        let created = match self.orders.create(order).await {
            Ok(created) => created,
            Err(e) => {
                self.reactivate_best_effort(&cart.id_string()).await;
                return Err(e.into());
            }
        };

        drop(_guard);

        tracing::info!(
            order_id = %created.id_string(),
            user_id,
            total = created.total,
            purchase_type = ?created.purchase_type,
            "Checkout completed"
        );

        // 7. Lifecycle hook (broadcast only - cannot fail the checkout)
        self.lifecycle.order_created(&created).await;

        Ok(created)
    }

    /// Delivery requires a well-formed coordinate pair; Dine-In must
    /// not carry one
    fn validate_location(request: &CheckoutRequest) -> OrderResult<Option<GeoPoint>> {
        if !request.purchase_type.requires_location() {
            return Ok(None);
        }

        let input = request
            .delivery_location
            .as_ref()
            .ok_or_else(|| {
                OrderError::InvalidLocation("deliveryLocation is required for Delivery".to_string())
            })?;

        GeoPoint::try_from_coordinates(&input.coordinates)
            .map(Some)
            .map_err(|e| OrderError::InvalidLocation(e.to_string()))
    }

    async fn reactivate_best_effort(&self, cart_id: &str) {
        if let Err(e) = self.carts.reactivate(cart_id).await {
            tracing::error!(cart_id, error = %e, "Failed to reactivate cart after aborted checkout");
        }
    }
}
