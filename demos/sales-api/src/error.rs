use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use shopify_sales_sdk::models::ErrorResponse;
use shopify_sales_sdk::SalesError;

/// Unified error type that renders as a JSON
/// `{"success": false, "error": "...", "code": "..."}` response.
pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<SalesError> for AppError {
    fn from(e: SalesError) -> Self {
        tracing::error!(error = %e, code = e.code(), "request failed");
        let status = if e.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            body: ErrorResponse::from(&e),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection, "rejected query string");
        Self {
            status: rejection.status(),
            body: ErrorResponse::new(rejection.body_text(), "INVALID_ARGUMENT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;
    use shopify_sales_sdk::DateRangeRequest;

    #[test]
    fn bad_query_string_uses_json_error_envelope() {
        let uri: Uri = "/api/shopify/orders?range=30d&range=90d".parse().unwrap();
        let rejection = Query::<DateRangeRequest>::try_from_uri(&uri).unwrap_err();
        let err = AppError::from(rejection);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let body = serde_json::to_value(&err.body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
        assert!(body["error"].as_str().unwrap().contains("duplicate field"));
    }
}
