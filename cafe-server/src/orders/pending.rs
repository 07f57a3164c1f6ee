//! Pending-order counter
//!
//! Derived aggregate: the count of orders currently in `Pending`.
//! Always recomputed from the order store - never incremented or
//! decremented in place, because concurrent checkouts and admin updates
//! would make an in-memory delta drift from persisted state.

use crate::db::repository::{OrderRepository, RepoResult};
use crate::message::Notifier;
use shared::message::{BusEvent, EVENT_PENDING_ORDERS_UPDATED, PendingCountPayload};
use shared::order::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PendingCounter {
    orders: OrderRepository,
    notifier: Notifier,
}

impl PendingCounter {
    pub fn new(db: Surreal<Db>, notifier: Notifier) -> Self {
        Self {
            orders: OrderRepository::new(db),
            notifier,
        }
    }

    /// Point-in-time count of orders in `Pending`, computed fresh from
    /// the store on every call
    pub async fn get_pending_count(&self) -> RepoResult<u64> {
        self.orders.count_by_status(OrderStatus::Pending).await
    }

    /// Recompute the count and push `pending-orders-updated`.
    ///
    /// A failure here (store read or broadcast) is logged and swallowed:
    /// the triggering state change already succeeded, and a momentarily
    /// stale count is corrected by the next recompute.
    pub async fn recompute_and_broadcast(&self) {
        match self.get_pending_count().await {
            Ok(count) => {
                let payload = PendingCountPayload { count };
                self.notifier.publish(BusEvent::broadcast(
                    EVENT_PENDING_ORDERS_UPDATED,
                    serde_json::json!(payload),
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to recompute pending count");
            }
        }
    }
}
