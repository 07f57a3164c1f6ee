//! CartService - active cart mutations and history
//!
//! Every operation targets the unique active cart of one user and is
//! persisted immediately (no batching). Prices and names are
//! snapshotted from the catalog at add time; adding the same product
//! again only increments quantity - the first-added price wins.
//!
//! Mutations hold the user's lock from [`UserLocks`], the same one
//! checkout holds across its claim. A cart write can therefore never
//! interleave with a checkout in flight for the same user.

use super::{OrderError, OrderResult, UserLocks};
use crate::db::models::Cart;
use crate::db::repository::{CartRepository, ProductRepository};
use shared::order::CartLineItem;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CartService {
    carts: CartRepository,
    products: ProductRepository,
    locks: UserLocks,
}

impl CartService {
    pub fn new(db: Surreal<Db>, locks: UserLocks) -> Self {
        Self {
            carts: CartRepository::new(db.clone()),
            products: ProductRepository::new(db),
            locks,
        }
    }

    /// Add a product to the user's active cart, creating the cart when
    /// none exists
    pub async fn add_item(&self, user_id: &str, product_id: &str, quantity: i32) -> OrderResult<Cart> {
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let _guard = self.locks.acquire(user_id).await;

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))?;

        match self.carts.find_active(user_id).await? {
            Some(cart) => {
                let mut items = cart.items.clone();
                match cart.item_index(product_id) {
                    // 已有此商品: 只加数量，保留首次加入时的价格快照
                    Some(idx) => items[idx].quantity += quantity,
                    None => items.push(CartLineItem {
                        product_id: product_id.to_string(),
                        name: product.name.clone(),
                        price: product.price,
                        quantity,
                    }),
                }
                Ok(self.carts.replace_items(&cart.id_string(), items).await?)
            }
            None => {
                let mut cart = Cart::new(user_id);
                cart.items.push(CartLineItem {
                    product_id: product_id.to_string(),
                    name: product.name.clone(),
                    price: product.price,
                    quantity,
                });
                Ok(self.carts.create_active(cart).await?)
            }
        }
    }

    /// Set the quantity of an existing line item
    pub async fn update_item_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i32,
    ) -> OrderResult<Cart> {
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let _guard = self.locks.acquire(user_id).await;

        let cart = self
            .carts
            .find_active(user_id)
            .await?
            .ok_or(OrderError::CartNotFound)?;
        let idx = cart
            .item_index(product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;

        let mut items = cart.items.clone();
        items[idx].quantity = quantity;
        Ok(self.carts.replace_items(&cart.id_string(), items).await?)
    }

    /// Remove a line item from the active cart
    pub async fn remove_item(&self, user_id: &str, product_id: &str) -> OrderResult<Cart> {
        let _guard = self.locks.acquire(user_id).await;

        let cart = self
            .carts
            .find_active(user_id)
            .await?
            .ok_or(OrderError::CartNotFound)?;
        let idx = cart
            .item_index(product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.to_string()))?;

        let mut items = cart.items.clone();
        items.remove(idx);
        Ok(self.carts.replace_items(&cart.id_string(), items).await?)
    }

    pub async fn get_active_cart(&self, user_id: &str) -> OrderResult<Option<Cart>> {
        Ok(self.carts.find_active(user_id).await?)
    }

    /// Closed carts, newest first
    pub async fn list_history(&self, user_id: &str) -> OrderResult<Vec<Cart>> {
        Ok(self.carts.list_history(user_id).await?)
    }

    /// Merge a closed cart's line items into the active cart, summing
    /// quantities for overlapping products. Creates the active cart
    /// when none exists. Returns the number of line items merged.
    pub async fn reorder_from_historical_cart(
        &self,
        user_id: &str,
        cart_id: &str,
    ) -> OrderResult<usize> {
        let _guard = self.locks.acquire(user_id).await;

        let historical = self
            .carts
            .find_closed(user_id, cart_id)
            .await?
            .ok_or_else(|| OrderError::HistoricalCartNotFound(cart_id.to_string()))?;

        let merged = historical.items.len();

        match self.carts.find_active(user_id).await? {
            Some(active) => {
                let mut items = active.items.clone();
                for old in &historical.items {
                    match items.iter_mut().find(|i| i.product_id == old.product_id) {
                        Some(existing) => existing.quantity += old.quantity,
                        None => items.push(old.clone()),
                    }
                }
                self.carts.replace_items(&active.id_string(), items).await?;
            }
            None => {
                let mut cart = Cart::new(user_id);
                cart.items = historical.items.clone();
                self.carts.create_active(cart).await?;
            }
        }

        Ok(merged)
    }

    /// Delete the active cart row entirely (not a soft deactivation).
    /// Returns false when there was no active cart.
    pub async fn clear(&self, user_id: &str) -> OrderResult<bool> {
        let _guard = self.locks.acquire(user_id).await;
        Ok(self.carts.delete_active(user_id).await?)
    }
}
