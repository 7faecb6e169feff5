use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Summary: Store-wide totals for one aggregation run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_gross_sales: f64,
    pub total_discounts: f64,
    pub total_refunds: f64,
    pub total_taxes: f64,
    pub total_shipping: f64,
    pub net_sales: f64,
    pub order_count: u64,
}

// ---------------------------------------------------------------------------
// StudioAggregate: Finalized per-studio totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioAggregate {
    pub name: String,
    pub gross_sales: f64,
    pub discounts: f64,
    pub refunds: f64,
    pub taxes: f64,
    pub net_sales: f64,
    pub quantity: f64,
    pub order_count: u64,
    #[serde(default)]
    pub orders: Vec<StudioOrderLine>,
}

/// One line item's contribution to a studio, in stream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioOrderLine {
    pub order_id: String,
    pub order_name: Option<String>,
    pub date: Option<String>,
    pub amount: f64,
}

// ---------------------------------------------------------------------------
// DailyAggregate / MonthlyAggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub date: String,
    pub gross_sales: f64,
    pub discounts: f64,
    pub refunds: f64,
    pub taxes: f64,
    pub shipping: f64,
    pub net_sales: f64,
    pub order_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub month: String,
    pub gross_sales: f64,
    pub discounts: f64,
    pub refunds: f64,
    pub taxes: f64,
    pub shipping: f64,
    pub net_sales: f64,
    pub order_count: u64,
}

// ---------------------------------------------------------------------------
// SalesReport: Output of one aggregation run
// ---------------------------------------------------------------------------

/// First and last order dates covered by a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub summary: Summary,
    pub studios: Vec<StudioAggregate>,
    pub by_date: Vec<DailyAggregate>,
    pub by_month: Vec<MonthlyAggregate>,
    pub date_range: DateRange,
}

impl SalesReport {
    /// The report for an empty order stream: zero totals, no groups, no dates.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.order_count == 0
    }
}
