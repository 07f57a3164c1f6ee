//! Order Domain Module
//!
//! This module provides the order vocabulary shared between server and
//! clients:
//! - Status: the order lifecycle state machine and its transition table
//! - Types: payment/purchase enums, geo points, line item snapshots

pub mod status;
pub mod types;

// Re-exports
pub use status::{NATURAL_FLOW, OrderStatus};
pub use types::*;
