//! Product Model
//!
//! The catalog is owned by an external back office; the ordering core
//! only reads name/price/image when snapshotting cart line items.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    /// Current unit price; snapshotted into carts/orders, never linked
    pub price: f64,
    #[serde(default)]
    pub image: String,
    /// On-hand stock. Not decremented by checkout (see design notes).
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub stock: Option<i32>,
}
