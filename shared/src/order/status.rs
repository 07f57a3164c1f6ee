//! Order status state machine
//!
//! The lifecycle is a small explicit state machine. The natural flow is
//! captured in [`NATURAL_FLOW`]; admin status updates are deliberately
//! more permissive (any non-terminal order can be forced to any status,
//! including skipping steps), but terminal orders are frozen for
//! everyone. Customer-facing transitions (`cancel`, `confirm_delivery`)
//! are gated by the stricter predicates below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Awaiting admin acknowledgement (counted by the pending counter)
    #[default]
    Pending,
    /// Acknowledged, payment/stock checks in progress
    Processing,
    /// In the kitchen
    Preparing,
    /// Courier on the way (Delivery orders)
    OutForDelivery,
    /// Terminal: received by the customer
    Delivered,
    /// Terminal: canceled by customer or admin
    Canceled,
}

/// Natural transition table, one row per non-terminal source state.
///
/// This is the documented flow the storefront UI walks through. Admin
/// overrides are allowed to skip forward (see [`OrderStatus::admin_can_force`]);
/// the table itself is the reference artifact for tests and clients.
pub const NATURAL_FLOW: &[(OrderStatus, &[OrderStatus])] = &[
    (
        OrderStatus::Pending,
        &[
            OrderStatus::Processing,
            OrderStatus::Preparing,
            OrderStatus::Canceled,
        ],
    ),
    (
        OrderStatus::Processing,
        &[OrderStatus::Preparing, OrderStatus::Canceled],
    ),
    (
        OrderStatus::Preparing,
        &[OrderStatus::OutForDelivery, OrderStatus::Canceled],
    ),
    (OrderStatus::OutForDelivery, &[OrderStatus::Delivered]),
];

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }

    /// Customer/admin cancellation is only allowed before the kitchen
    /// hands the order off
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Pending | Self::Preparing)
    }

    /// Successor states in the natural flow (empty for terminal states)
    pub fn successors(&self) -> &'static [OrderStatus] {
        NATURAL_FLOW
            .iter()
            .find(|(from, _)| from == self)
            .map(|(_, to)| *to)
            .unwrap_or(&[])
    }

    /// Whether an admin override may move an order from `self` to `target`.
    ///
    /// Admins can force any non-terminal order into any other status;
    /// only the terminal guard applies. Skipping states is permitted.
    pub fn admin_can_force(&self, target: OrderStatus) -> bool {
        !self.is_terminal() && *self != target
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Processing => write!(f, "Processing"),
            Self::Preparing => write!(f, "Preparing"),
            Self::OutForDelivery => write!(f, "Out for Delivery"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Canceled => write!(f, "Canceled"),
        }
    }
}
