//! Product Repository
//!
//! Read-only catalog lookup for the ordering core; `create` and
//! `set_price` exist for seeding and for the back office collaborator.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid product ID format: {}", id)))
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let record_id = Self::parse_id(id)?;
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            image: data.image.unwrap_or_default(),
            stock: data.stock.unwrap_or(0),
            is_active: true,
        };
        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Catalog price change. Existing cart/order snapshots keep their
    /// copied price.
    pub async fn set_price(&self, id: &str, price: f64) -> RepoResult<Product> {
        let record_id = Self::parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $product SET price = $price RETURN AFTER")
            .bind(("product", record_id))
            .bind(("price", price))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }
}
