//! Cart Model
//!
//! One active cart per user; closed carts are kept as history and never
//! mutated again. Checkout closes via `is_active = false`, while an
//! explicit "clear" deletes the row outright - both paths exist on
//! purpose.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::order::CartLineItem;
use surrealdb::RecordId;

/// Shopping cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Owning user (opaque reference issued by the auth collaborator)
    pub user_id: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    pub created_at: String,
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

impl Cart {
    /// Fresh active cart for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: None,
            user_id: user_id.into(),
            is_active: true,
            items: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> String {
        self.id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of a product's line item, if present
    pub fn item_index(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.line_total()).sum()
    }
}
