use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use shopify_sales_sdk::export::report_file_name;
use shopify_sales_sdk::DateRangeRequest;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/shopify/export.csv?range=90d
///
/// Studio rows as a CSV download named after today's date.
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DateRangeRequest>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let csv = state.sdk.export_csv(params).await?;
    let file_name = report_file_name(chrono::Utc::now().date_naive());
    let disposition = format!("attachment; filename=\"{file_name}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
