//! Database Module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests) plus the
//! schema definition for the ordering core.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "cafe";
const DATABASE: &str = "cafe";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::finish_init(db).await
    }

    /// In-memory database for tests
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::finish_init(db).await
    }

    async fn finish_init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;
        tracing::info!("Database connection established (SurrealDB embedded)");

        Ok(Self { db })
    }
}

/// Define tables and indexes.
///
/// Tables stay SCHEMALESS; `delivery_location` / `admin_location` are
/// stored as GeoJSON objects so location queries (`geo::distance`)
/// remain possible without a typed field.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS cart SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;

        -- checkout and cart mutations always target the unique active cart
        DEFINE INDEX IF NOT EXISTS cart_user_active ON cart FIELDS user_id, is_active;
        DEFINE INDEX IF NOT EXISTS order_user ON order FIELDS user_id;
        DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ProductCreate;
    use crate::db::repository::ProductRepository;

    #[tokio::test]
    async fn on_disk_database_round_trips_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");

        let service = DbService::new(&path.to_string_lossy()).await.unwrap();
        let repo = ProductRepository::new(service.db.clone());
        let created = repo
            .create(ProductCreate {
                name: "Americano".to_string(),
                price: 3.5,
                image: None,
                stock: Some(10),
            })
            .await
            .unwrap();

        let found = repo.find_by_id(&created.id_string()).await.unwrap().unwrap();
        assert_eq!(found.name, "Americano");
    }

    #[tokio::test]
    async fn schema_definition_is_idempotent() {
        let service = DbService::new_in_memory().await.unwrap();
        // Re-running the IF NOT EXISTS definitions must not error
        define_schema(&service.db).await.unwrap();
    }
}
