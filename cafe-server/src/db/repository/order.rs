//! Order Repository
//!
//! Orders are created once by checkout and never deleted; the only
//! mutable fields are `status`, `payment_status` and `admin_location`.
//! Aggregations for the back office (pending count, most-sold,
//! monthly sales) live here too.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use serde::{Deserialize, Serialize};
use shared::order::{GeoPoint, OrderStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

/// Row of the most-sold aggregation, returned to the dashboard as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MostSoldRow {
    pub product_id: String,
    pub name: String,
    pub sold: i64,
}

/// Row of the monthly sales aggregation, returned to the dashboard
/// as-is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySalesRow {
    /// "YYYY-MM"
    pub month: String,
    pub revenue: f64,
    pub orders: u64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn parse_id(id: &str) -> RepoResult<RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid order ID format: {}", id)))
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record_id = Self::parse_id(id)?;
        let order: Option<Order> = self.base.db().select(record_id).await?;
        Ok(order)
    }

    /// A user's orders, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user_id = $user ORDER BY created_at DESC")
            .bind(("user", user_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// All orders, newest first (admin listing)
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Persist a status transition. Last write wins on concurrent admin
    /// updates (documented race, see lifecycle engine).
    pub async fn set_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let record_id = Self::parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", record_id))
            .bind(("status", status))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Update the courier tracking position only
    pub async fn set_admin_location(&self, id: &str, location: GeoPoint) -> RepoResult<Order> {
        let record_id = Self::parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET admin_location = $location, updated_at = $now RETURN AFTER")
            .bind(("order", record_id))
            .bind(("location", location))
            .bind(("now", chrono::Utc::now().to_rfc3339()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Point-in-time count of orders in a given status.
    ///
    /// Always computed fresh from the store - the pending counter must
    /// never maintain an in-memory delta.
    pub async fn count_by_status(&self, status: OrderStatus) -> RepoResult<u64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS count FROM order WHERE status = $status GROUP ALL")
            .bind(("status", status))
            .await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }

    /// Most sold products since `since` (RFC3339), canceled orders
    /// excluded. Sorting and truncation happen here rather than in
    /// SurrealQL (WHERE + LIMIT interacts badly with ORDER BY in the
    /// embedded engine).
    pub async fn most_sold_products(
        &self,
        since: &str,
        limit: usize,
    ) -> RepoResult<Vec<MostSoldRow>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT items.product_id AS product_id, items.name AS name, \
                 math::sum(items.quantity) AS sold \
                 FROM order WHERE created_at >= $since AND status != 'CANCELED' \
                 SPLIT items GROUP BY product_id, name",
            )
            .bind(("since", since.to_string()))
            .await?;
        let mut rows: Vec<MostSoldRow> = result.take(0)?;
        rows.sort_by(|a, b| b.sold.cmp(&a.sold));
        rows.truncate(limit);
        Ok(rows)
    }

    /// Per-month revenue and order count for one year, canceled orders
    /// excluded
    pub async fn monthly_sales(&self, year: i32) -> RepoResult<Vec<MonthlySalesRow>> {
        let prefix = format!("{year}-");
        let mut result = self
            .base
            .db()
            .query(
                "SELECT string::slice(created_at, 0, 7) AS month, \
                 math::sum(total) AS revenue, count() AS orders \
                 FROM order WHERE string::starts_with(created_at, $prefix) \
                 AND status != 'CANCELED' \
                 GROUP BY month",
            )
            .bind(("prefix", prefix))
            .await?;
        let mut rows: Vec<MonthlySalesRow> = result.take(0)?;
        rows.sort_by(|a, b| a.month.cmp(&b.month));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The statistics handlers hand these rows straight to the JSON
    // response body
    #[test]
    fn aggregation_rows_serialize_for_the_api() {
        let row = MostSoldRow {
            product_id: "product:latte".to_string(),
            name: "Latte".to_string(),
            sold: 7,
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["sold"], 7);
        assert_eq!(v["name"], "Latte");

        let row = MonthlySalesRow {
            month: "2025-03".to_string(),
            revenue: 120.5,
            orders: 4,
        };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["month"], "2025-03");
        assert_eq!(v["orders"], 4);
    }
}
