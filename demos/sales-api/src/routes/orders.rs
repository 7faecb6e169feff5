use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use shopify_sales_sdk::models::SalesResponse;
use shopify_sales_sdk::DateRangeRequest;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/shopify/orders?range=30d
/// GET /api/shopify/orders?startDate=2024-01-01&endDate=2024-01-31
///
/// Aggregated sales report wrapped in `{ success, metadata, data }`.
pub async fn get_orders(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DateRangeRequest>, QueryRejection>,
) -> Result<Json<SalesResponse>, AppError> {
    let Query(params) = params?;
    let response = state.sdk.response(params).await?;
    Ok(Json(response))
}
