//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod product;

// Ordering
pub mod cart;
pub mod order;

// Re-exports
pub use cart::Cart;
pub use order::Order;
pub use product::{Product, ProductCreate};
