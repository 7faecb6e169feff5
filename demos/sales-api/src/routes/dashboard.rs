use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::{json, Value};
use shopify_sales_sdk::DateRangeRequest;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/shopify/dashboard?range=ytd
///
/// Chart-ready read model: summary, studio metrics, monthly revenue,
/// waterfall steps, donut slices and KPIs.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DateRangeRequest>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = params?;
    let model = state.sdk.dashboard(params).await?;
    Ok(Json(json!({ "success": true, "data": model })))
}
