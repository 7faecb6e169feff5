use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReadModel: Chart-ready view derived from a SalesReport payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadModel {
    pub summary: DashboardSummary,
    pub valid_studios: Vec<StudioMetrics>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub waterfall_data: Vec<WaterfallStep>,
    pub studio_donut_data: Vec<DonutSlice>,
    pub kpis: DashboardKpis,
}

/// Re-normalized store totals. `order_count` is floored at 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_gross_sales: f64,
    pub net_sales: f64,
    pub order_count: f64,
    pub total_refunds: f64,
    pub total_discounts: f64,
    pub total_taxes: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioMetrics {
    pub name: String,
    pub net_sales: f64,
    pub gross_sales: f64,
    pub order_count: f64,
    pub quantity: f64,
    pub discounts: f64,
    pub refunds: f64,
    pub taxes: f64,
    pub avg_order_value: f64,
    /// Discounts as a percentage of gross sales.
    pub discount_rate: f64,
    /// Refunds as a percentage of gross sales.
    pub refund_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Display label such as `"Jan 2024"`.
    pub month: String,
    pub gross: f64,
    pub net: f64,
    pub orders: f64,
    pub discounts: f64,
    pub refunds: f64,
}

// ---------------------------------------------------------------------------
// Waterfall
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallStep {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    Positive,
    Negative,
    Total,
}

/// Vertical extent of one waterfall bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterfallBar {
    pub name: String,
    pub start: f64,
    pub end: f64,
    /// Bar magnitude; middle steps carry the absolute delta.
    pub value: f64,
    pub kind: BarKind,
    /// Signed step value as it should be labelled.
    pub display_value: f64,
}

// ---------------------------------------------------------------------------
// Distribution + KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSlice {
    pub name: String,
    pub value: f64,
    pub orders: f64,
    /// Share of total net sales, rounded to one decimal.
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub avg_order_value: f64,
    pub discount_share_of_gross: f64,
    pub total_deductions: f64,
    pub deductions_share_of_gross: f64,
    pub effective_tax_rate: f64,
    pub net_margin: f64,
    pub active_studios: usize,
    pub studios_with_ten_plus_orders: usize,
}
