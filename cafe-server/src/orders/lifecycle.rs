//! LifecycleEngine - the order status state machine
//!
//! Governs every status transition, who may trigger it, and the side
//! effects of a successful transition:
//!
//! - every transition emits `order-status-changed`
//! - entering `Canceled` additionally emits `order-canceled` (full order)
//! - any transition whose before- or after-state is `Pending` triggers a
//!   pending-count recompute and broadcast
//!
//! Persistence failures surface to the caller; broadcast failures are
//! logged and swallowed and never roll back a committed transition.
//!
//! Concurrent admin updates on the same order are not serialized:
//! last write wins on `status`. This is an accepted race given the
//! admin-only, low-concurrency nature of status updates.

use super::{OrderError, OrderResult, PendingCounter};
use crate::db::models::Order;
use crate::db::repository::OrderRepository;
use crate::message::Notifier;
use shared::message::{
    BusEvent, EVENT_NEW_ORDER, EVENT_ORDER_CANCELED, EVENT_ORDER_STATUS_CHANGED,
    NewOrderPayload, StatusChangedPayload,
};
use shared::order::{GeoPoint, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct LifecycleEngine {
    orders: OrderRepository,
    notifier: Notifier,
    pending: PendingCounter,
}

impl LifecycleEngine {
    pub fn new(db: Surreal<Db>, notifier: Notifier) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            notifier: notifier.clone(),
            pending: PendingCounter::new(db, notifier),
        }
    }

    pub fn pending(&self) -> &PendingCounter {
        &self.pending
    }

    /// Hook invoked by the checkout orchestrator after an order is
    /// persisted: broadcast `new-order` and refresh the pending count.
    pub async fn order_created(&self, order: &Order) {
        let payload = NewOrderPayload {
            order_id: order.id_string(),
            user_id: order.user_id.clone(),
            status: order.status,
            delivery_location: order.delivery_location.clone(),
            items: order.items.clone(),
            purchase_type: order.purchase_type,
        };
        self.notifier.publish(BusEvent::broadcast(
            EVENT_NEW_ORDER,
            serde_json::json!(payload),
        ));
        self.pending.recompute_and_broadcast().await;
    }

    /// Admin-driven status override.
    ///
    /// Deliberately permissive: any non-terminal order can be forced to
    /// any other status, skipping states. Only terminal orders are
    /// frozen.
    pub async fn update_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
    ) -> OrderResult<Order> {
        let order = self.load(order_id).await?;
        let before = order.status;

        if before.is_terminal() {
            return Err(OrderError::TerminalState { current: before });
        }
        if !before.admin_can_force(new_status) {
            return Err(OrderError::InvalidTransition {
                from: before,
                to: new_status,
            });
        }

        let updated = self.orders.set_status(order_id, new_status).await?;
        tracing::info!(order_id, from = %before, to = %new_status, "Order status updated");
        self.after_transition(&updated, before).await;
        Ok(updated)
    }

    /// Customer- or admin-driven cancellation. Only allowed while the
    /// order is still Pending or Preparing.
    pub async fn cancel(&self, order_id: &str) -> OrderResult<Order> {
        let order = self.load(order_id).await?;
        let before = order.status;

        if !before.can_cancel() {
            return Err(OrderError::InvalidTransition {
                from: before,
                to: OrderStatus::Canceled,
            });
        }

        let updated = self.orders.set_status(order_id, OrderStatus::Canceled).await?;
        tracing::info!(order_id, from = %before, "Order canceled");
        self.after_transition(&updated, before).await;
        Ok(updated)
    }

    /// Customer confirms receipt: Out for Delivery -> Delivered
    pub async fn confirm_delivery(&self, order_id: &str) -> OrderResult<Order> {
        let order = self.load(order_id).await?;
        let before = order.status;

        if before != OrderStatus::OutForDelivery {
            return Err(OrderError::InvalidTransition {
                from: before,
                to: OrderStatus::Delivered,
            });
        }

        let updated = self.orders.set_status(order_id, OrderStatus::Delivered).await?;
        tracing::info!(order_id, "Order delivery confirmed");
        self.after_transition(&updated, before).await;
        Ok(updated)
    }

    /// Update the courier tracking position. Not a status transition;
    /// allowed at any non-terminal status.
    pub async fn update_admin_location(
        &self,
        order_id: &str,
        coordinates: &[f64],
    ) -> OrderResult<Order> {
        let order = self.load(order_id).await?;
        if order.status.is_terminal() {
            return Err(OrderError::TerminalState {
                current: order.status,
            });
        }

        let location = GeoPoint::try_from_coordinates(coordinates)
            .map_err(|e| OrderError::InvalidLocation(e.to_string()))?;
        Ok(self.orders.set_admin_location(order_id, location).await?)
    }

    async fn load(&self, order_id: &str) -> OrderResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Side effects of a committed transition. Broadcast-only: nothing
    /// here can fail the transition itself.
    async fn after_transition(&self, updated: &Order, before: OrderStatus) {
        let order_id = updated.id_string();

        let payload = StatusChangedPayload {
            order_id: order_id.clone(),
            new_status: updated.status,
        };
        self.notifier.publish(BusEvent::broadcast(
            EVENT_ORDER_STATUS_CHANGED,
            serde_json::json!(payload),
        ));

        if updated.status == OrderStatus::Canceled {
            match serde_json::to_value(updated) {
                Ok(full_order) => {
                    // Full order payload; unscoped so both the dashboard
                    // and the owning customer's tracking view see it
                    self.notifier
                        .publish(BusEvent::broadcast(EVENT_ORDER_CANCELED, full_order));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to serialize canceled order");
                }
            }
        }

        if before == OrderStatus::Pending || updated.status == OrderStatus::Pending {
            self.pending.recompute_and_broadcast().await;
        }
    }
}
