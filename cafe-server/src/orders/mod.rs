//! 订单核心 - cart / checkout / lifecycle / pending
//!
//! The control flow of the ordering core:
//!
//! ```text
//! CartService ──▶ CheckoutOrchestrator ──▶ OrderRepository
//!                        │
//!                        └──▶ LifecycleEngine ──▶ PendingCounter ──▶ Notifier
//!                                   ▲
//!            admin / customer ──────┘  (status update, cancel, confirm)
//! ```
//!
//! Admin and customer actions re-enter at the lifecycle engine
//! directly; only checkout goes through the orchestrator.

pub mod cart;
pub mod checkout;
pub mod lifecycle;
pub mod pending;

#[cfg(test)]
mod tests;

pub use cart::CartService;
pub use checkout::{CheckoutOrchestrator, CheckoutRequest, DeliveryLocationInput};
pub use lifecycle::LifecycleEngine;
pub use pending::PendingCounter;

use crate::db::repository::RepoError;
use crate::utils::AppError;
use dashmap::DashMap;
use shared::order::OrderStatus;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-user mutual exclusion shared by cart mutations and checkout.
///
/// The single-active-cart invariant requires that nothing touches a
/// user's cart between checkout's claim and its compensation path, so
/// every cart write and every checkout goes through the same lock.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

/// Ordering core errors
///
/// Validation and state errors are rejected before any persistence
/// write; no variant here ever corresponds to a partially applied
/// mutation.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout found no active cart, or the active cart has no items
    #[error("Active cart is missing or empty")]
    EmptyCart,

    /// No active cart to mutate
    #[error("No active cart")]
    CartNotFound,

    /// Referenced closed cart does not exist for this user
    #[error("Cart not found: {0}")]
    HistoricalCartNotFound(String),

    /// Product is not a line item of the active cart
    #[error("Item not found in cart: {0}")]
    ItemNotFound(String),

    /// Catalog lookup failed
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Quantity must be >= 1
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// Malformed or missing delivery coordinates
    #[error("Invalid delivery location: {0}")]
    InvalidLocation(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Order already reached Delivered or Canceled
    #[error("Order is already {current}, no further transitions allowed")]
    TerminalState { current: OrderStatus },

    /// Transition not permitted from the current status
    #[error("Cannot go from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Storage error: {0}")]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::EmptyCart
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidLocation(_) => AppError::Validation(err.to_string()),

            OrderError::CartNotFound
            | OrderError::HistoricalCartNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::ProductNotFound(_)
            | OrderError::OrderNotFound(_) => AppError::NotFound(err.to_string()),

            // Named-state rejection so the caller's UI can explain why
            // the action is unavailable
            OrderError::TerminalState { .. } | OrderError::InvalidTransition { .. } => {
                AppError::BusinessRule(err.to_string())
            }

            OrderError::Repo(e) => match e {
                RepoError::NotFound(msg) => AppError::NotFound(msg.clone()),
                RepoError::Validation(msg) => AppError::Validation(msg.clone()),
                _ => AppError::Database(e.to_string()),
            },
        }
    }
}

/// Result type for ordering core operations
pub type OrderResult<T> = Result<T, OrderError>;
