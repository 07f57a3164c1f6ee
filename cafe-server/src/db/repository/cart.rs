//! Cart Repository
//!
//! All mutations target the unique active cart per user. `close_active`
//! is the atomic claim used by checkout (conditional deactivate,
//! RETURN BEFORE); `delete_active` is the hard delete behind "clear".

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Cart;
use shared::order::CartLineItem;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "cart";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid cart ID format: {}", id)))
    }

    /// The user's active cart, if any
    pub async fn find_active(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user_id = $user AND is_active = true LIMIT 1")
            .bind(("user", user_id.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Persist a fresh active cart
    pub async fn create_active(&self, cart: Cart) -> RepoResult<Cart> {
        let created: Option<Cart> = self.base.db().create(TABLE).content(cart).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Overwrite the line items of a cart
    pub async fn replace_items(&self, cart_id: &str, items: Vec<CartLineItem>) -> RepoResult<Cart> {
        let id = Self::parse_id(cart_id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $cart SET items = $items, updated_at = $now RETURN AFTER")
            .bind(("cart", id))
            .bind(("items", items))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Cart {} not found", cart_id)))
    }

    /// Atomically claim and close the user's active cart.
    ///
    /// The conditional update is a single read-modify-write at the
    /// store: of two concurrent claims only one sees `is_active = true`.
    /// Returns the cart as it was before closing (with its items), or
    /// None when no active cart existed.
    pub async fn close_active(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE cart SET is_active = false, updated_at = $now \
                 WHERE user_id = $user AND is_active = true RETURN BEFORE",
            )
            .bind(("user", user_id.to_string()))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Compensation path: re-open a claimed cart after a failed checkout
    pub async fn reactivate(&self, cart_id: &str) -> RepoResult<()> {
        let id = Self::parse_id(cart_id)?;
        self.base
            .db()
            .query("UPDATE $cart SET is_active = true, updated_at = $now")
            .bind(("cart", id))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?;
        Ok(())
    }

    /// Hard-delete the user's active cart. Returns false when there was
    /// none.
    pub async fn delete_active(&self, user_id: &str) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("DELETE FROM cart WHERE user_id = $user AND is_active = true RETURN BEFORE")
            .bind(("user", user_id.to_string()))
            .await?;
        let deleted: Vec<Cart> = result.take(0)?;
        Ok(!deleted.is_empty())
    }

    /// Closed carts, newest first
    pub async fn list_history(&self, user_id: &str) -> RepoResult<Vec<Cart>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cart WHERE user_id = $user AND is_active = false \
                 ORDER BY updated_at DESC",
            )
            .bind(("user", user_id.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts)
    }

    /// A specific closed cart belonging to the user (for reorder)
    pub async fn find_closed(&self, user_id: &str, cart_id: &str) -> RepoResult<Option<Cart>> {
        let id = Self::parse_id(cart_id)?;
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM cart WHERE id = $cart AND user_id = $user AND is_active = false",
            )
            .bind(("cart", id))
            .bind(("user", user_id.to_string()))
            .await?;
        let carts: Vec<Cart> = result.take(0)?;
        Ok(carts.into_iter().next())
    }
}
