use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::report::{DateRange, SalesReport};
use crate::error::SalesError;

// ---------------------------------------------------------------------------
// SalesResponse: `{ success: true, metadata, data }`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub total_orders: u64,
    pub date_range: DateRange,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesResponse {
    pub success: bool,
    pub metadata: ResponseMetadata,
    pub data: SalesReport,
}

impl SalesResponse {
    pub fn new(report: SalesReport, generated_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            metadata: ResponseMetadata {
                total_orders: report.summary.order_count,
                date_range: report.date_range.clone(),
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            data: report,
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorResponse: `{ success: false, error, code }`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(error, "INTERNAL_ERROR")
    }
}

impl From<&SalesError> for ErrorResponse {
    fn from(e: &SalesError) -> Self {
        Self::new(e.to_string(), e.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn success_envelope_mirrors_report_metadata() {
        let mut report = SalesReport::empty();
        report.summary.order_count = 3;
        report.date_range = DateRange {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-09".into()),
        };
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let value = serde_json::to_value(SalesResponse::new(report, at)).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["metadata"]["totalOrders"], 3);
        assert_eq!(value["metadata"]["dateRange"]["start"], "2024-01-01");
        assert_eq!(value["metadata"]["generatedAt"], "2024-02-01T08:00:00.000Z");
        assert!(value["data"]["byDate"].is_array());
    }

    #[test]
    fn error_envelope_carries_code() {
        let err = SalesError::GraphQl("Access denied".into());
        let value = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "UPSTREAM_ERROR");
        assert_eq!(ErrorResponse::internal("boom").code, "INTERNAL_ERROR");
    }
}
