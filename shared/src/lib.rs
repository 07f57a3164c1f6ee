//! Shared types for the café ordering platform
//!
//! Domain vocabulary used by both the server and its clients:
//! - `order`: status state machine, payment/purchase enums, line items
//! - `message`: real-time event payloads pushed over the notifier

pub mod message;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use message::{BusEvent, Room};
pub use order::{
    CartLineItem, GeoPoint, OrderLineItem, OrderStatus, PaymentMethod, PaymentStatus, PurchaseType,
};
