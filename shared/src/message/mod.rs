//! Real-time event types
//!
//! These types are shared between the server's notifier and its
//! subscribers (admin dashboards, customer order-tracking views).
//! Delivery is best-effort / at-most-once: a subscriber that was
//! disconnected while an event fired re-pulls authoritative state over
//! the query API instead of expecting a replay.

pub mod payload;
pub use payload::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event name for a freshly checked-out order
pub const EVENT_NEW_ORDER: &str = "new-order";
/// Event name for an order entering `Canceled`
pub const EVENT_ORDER_CANCELED: &str = "order-canceled";
/// Event name for any successful status transition
pub const EVENT_ORDER_STATUS_CHANGED: &str = "order-status-changed";
/// Event name for a fresh pending-order count
pub const EVENT_PENDING_ORDERS_UPDATED: &str = "pending-orders-updated";

/// Topic scoping for subscribers.
///
/// The default publish targets [`Room::All`] (unscoped broadcast, the
/// minimum viable behavior). Admin dashboards and per-order tracking
/// views can narrow what they receive; authorization is not enforced at
/// this layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "room", content = "id")]
pub enum Room {
    /// Every connected subscriber
    All,
    /// Back-office dashboards
    Admin,
    /// Customers tracking one specific order ("order:xyz")
    Order(String),
}

impl Room {
    /// Whether an event published to `self` should reach a subscriber
    /// listening on `interest`
    pub fn matches(&self, interest: &Room) -> bool {
        match (self, interest) {
            (Room::All, _) | (_, Room::All) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Room::All => write!(f, "all"),
            Room::Admin => write!(f, "admin"),
            Room::Order(id) => write!(f, "order:{}", id),
        }
    }
}

/// A single pushed event: named topic plus JSON payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusEvent {
    pub room: Room,
    pub event: String,
    pub data: serde_json::Value,
}

impl BusEvent {
    pub fn new(room: Room, event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            room,
            event: event.into(),
            data,
        }
    }

    /// Unscoped broadcast (the default)
    pub fn broadcast(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self::new(Room::All, event, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_room_matches_everything() {
        let order = Room::Order("order:1".to_string());
        assert!(Room::All.matches(&Room::Admin));
        assert!(Room::Admin.matches(&Room::All));
        assert!(order.matches(&Room::All));
        assert!(order.matches(&order.clone()));
        assert!(!order.matches(&Room::Admin));
        assert!(!Room::Admin.matches(&Room::Order("order:2".to_string())));
    }
}
