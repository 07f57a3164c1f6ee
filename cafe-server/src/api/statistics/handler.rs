//! Sales Statistics Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::repository::{MonthlySalesRow, MostSoldRow, OrderRepository};
use crate::utils::AppResult;

/// Query params for the most-sold aggregation
#[derive(Debug, Deserialize)]
pub struct MostSoldQuery {
    /// Look-back window in days
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_days() -> i64 {
    30
}

fn default_limit() -> usize {
    5
}

/// Most sold products in the look-back window
pub async fn most_sold(
    State(state): State<ServerState>,
    Query(query): Query<MostSoldQuery>,
) -> AppResult<Json<Vec<MostSoldRow>>> {
    let since = (chrono::Utc::now() - chrono::Duration::days(query.days)).to_rfc3339();
    let repo = OrderRepository::new(state.db.clone());
    let rows = repo.most_sold_products(&since, query.limit).await?;
    Ok(Json(rows))
}

/// Query params for monthly sales
#[derive(Debug, Deserialize)]
pub struct MonthlySalesQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MonthlySalesResponse {
    pub year: i32,
    pub months: Vec<MonthlySalesRow>,
}

/// Per-month revenue and order count for one year
pub async fn monthly_sales(
    State(state): State<ServerState>,
    Query(query): Query<MonthlySalesQuery>,
) -> AppResult<Json<MonthlySalesResponse>> {
    let year = query
        .year
        .unwrap_or_else(|| chrono::Datelike::year(&chrono::Utc::now()));
    let repo = OrderRepository::new(state.db.clone());
    let months = repo.monthly_sales(year).await?;
    Ok(Json(MonthlySalesResponse { year, months }))
}
