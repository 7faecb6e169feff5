//! Derivation of the dashboard read model from an aggregated report payload.
//!
//! Input is taken as untyped JSON so that a partially malformed payload
//! (missing fields, numbers sent as strings, garbage) still yields a usable
//! model: every number is re-normalized on the way in.

use chrono::NaiveDate;
use serde_json::Value;

use crate::aggregator::by_net_sales_desc;
use crate::config::UNKNOWN_STUDIO;
use crate::models::{
    BarKind, DashboardKpis, DashboardSummary, DonutSlice, MonthlyRevenue, ReadModel, SalesReport,
    StudioMetrics, WaterfallBar, WaterfallStep,
};
use crate::numeric::normalize_opt;

pub const GROSS_SALES_STEP: &str = "Gross Sales";
pub const DISCOUNTS_STEP: &str = "Discounts";
pub const REFUNDS_STEP: &str = "Refunds";
pub const TAXES_STEP: &str = "Taxes";
pub const NET_SALES_STEP: &str = "Net Sales";

/// Studios above this many orders are counted as established in the KPIs.
const ESTABLISHED_STUDIO_ORDERS: f64 = 10.0;

impl ReadModel {
    /// Derive the read model from a typed report.
    pub fn from_report(report: &SalesReport) -> Self {
        serde_json::to_value(report)
            .map(|data| derive_read_model(&data))
            .unwrap_or_default()
    }
}

/// Derive the chart-ready read model from a report payload.
///
/// Anything that is not a JSON object yields the empty model.
pub fn derive_read_model(data: &Value) -> ReadModel {
    if !data.is_object() {
        return ReadModel::default();
    }

    let summary = derive_summary(data.get("summary"));

    let mut valid_studios: Vec<StudioMetrics> = array_of(data, "studios")
        .map(studio_metrics)
        .filter(|s| s.net_sales > 0.0)
        .collect();
    valid_studios.sort_by(|a, b| by_net_sales_desc(a.net_sales, b.net_sales));

    let total_net_sales = share_denominator(&valid_studios, &summary);

    let monthly_revenue = array_of(data, "byMonth")
        .filter_map(monthly_revenue)
        .collect();

    let waterfall_data = waterfall_steps(&summary);

    let studio_donut_data = valid_studios
        .iter()
        .map(|s| DonutSlice {
            name: s.name.clone(),
            value: s.net_sales,
            orders: s.order_count,
            percentage: round1(s.net_sales / total_net_sales * 100.0),
        })
        .collect();

    let kpis = derive_kpis(&summary, &valid_studios);

    ReadModel {
        summary,
        valid_studios,
        monthly_revenue,
        waterfall_data,
        studio_donut_data,
        kpis,
    }
}

fn derive_summary(raw: Option<&Value>) -> DashboardSummary {
    let field = |name: &str| normalize_opt(raw.and_then(|s| s.get(name)));
    DashboardSummary {
        total_gross_sales: field("totalGrossSales"),
        net_sales: field("netSales"),
        order_count: field("orderCount").max(1.0),
        total_refunds: field("totalRefunds"),
        total_discounts: field("totalDiscounts"),
        total_taxes: field("totalTaxes"),
    }
}

fn studio_metrics(raw: &Value) -> StudioMetrics {
    let field = |name: &str| normalize_opt(raw.get(name));
    let net_sales = field("netSales");
    let gross_sales = field("grossSales");
    let order_count = field("orderCount").max(1.0);
    let discounts = field("discounts");
    let refunds = field("refunds");

    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNKNOWN_STUDIO)
        .to_string();

    StudioMetrics {
        name,
        net_sales,
        gross_sales,
        order_count,
        quantity: field("quantity"),
        discounts,
        refunds,
        taxes: field("taxes"),
        avg_order_value: net_sales / order_count,
        discount_rate: percent_of(discounts, gross_sales),
        refund_rate: percent_of(refunds, gross_sales),
    }
}

/// Denominator for studio shares: studio net total, else store net, else 1.
fn share_denominator(studios: &[StudioMetrics], summary: &DashboardSummary) -> f64 {
    let studio_total: f64 = studios.iter().map(|s| s.net_sales).sum();
    if studio_total != 0.0 {
        studio_total
    } else if summary.net_sales != 0.0 {
        summary.net_sales
    } else {
        1.0
    }
}

fn monthly_revenue(raw: &Value) -> Option<MonthlyRevenue> {
    let month = raw.get("month").and_then(Value::as_str)?;
    let label = month_label(month)?;
    Some(MonthlyRevenue {
        month: label,
        gross: normalize_opt(raw.get("grossSales")),
        net: normalize_opt(raw.get("netSales")),
        orders: normalize_opt(raw.get("orderCount")),
        discounts: normalize_opt(raw.get("discounts")),
        refunds: normalize_opt(raw.get("refunds")),
    })
}

/// `"2024-01"` → `"Jan 2024"`; `None` for anything that is not a year-month.
pub fn month_label(month: &str) -> Option<String> {
    if month.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%b %Y").to_string())
}

fn waterfall_steps(summary: &DashboardSummary) -> Vec<WaterfallStep> {
    let step = |name: &str, value: f64| WaterfallStep {
        name: name.to_string(),
        value,
    };
    vec![
        step(GROSS_SALES_STEP, summary.total_gross_sales),
        step(DISCOUNTS_STEP, -summary.total_discounts.abs()),
        step(REFUNDS_STEP, -summary.total_refunds.abs()),
        step(TAXES_STEP, summary.total_taxes),
        step(NET_SALES_STEP, summary.net_sales),
    ]
}

/// Lay out waterfall steps as bars.
///
/// The first step rises from zero and seeds the running total. Each middle
/// step spans from the previous running total to the new one. The
/// `"Net Sales"` step is drawn as an absolute total bar from zero to its own
/// value and does not touch the running total, so it does not have to line
/// up with the end of the last delta (taxes are added in the chain but not
/// in net sales).
pub fn waterfall_bars(steps: &[WaterfallStep]) -> Vec<WaterfallBar> {
    let mut cumulative = 0.0;
    let mut bars = Vec::with_capacity(steps.len());

    for (i, step) in steps.iter().enumerate() {
        let v = step.value;
        let bar = if i == 0 {
            cumulative = v;
            WaterfallBar {
                name: step.name.clone(),
                start: 0.0,
                end: v,
                value: v,
                kind: BarKind::Positive,
                display_value: v,
            }
        } else if step.name == NET_SALES_STEP {
            WaterfallBar {
                name: step.name.clone(),
                start: 0.0,
                end: v,
                value: v,
                kind: BarKind::Total,
                display_value: v,
            }
        } else {
            let next = cumulative + v;
            let rising = v >= 0.0;
            let bar = WaterfallBar {
                name: step.name.clone(),
                start: if rising { cumulative } else { next },
                end: if rising { next } else { cumulative },
                value: v.abs(),
                kind: if rising {
                    BarKind::Positive
                } else {
                    BarKind::Negative
                },
                display_value: v,
            };
            cumulative = next;
            bar
        };
        bars.push(bar);
    }

    bars
}

fn derive_kpis(summary: &DashboardSummary, studios: &[StudioMetrics]) -> DashboardKpis {
    let gross = summary.total_gross_sales;
    let deductions = summary.total_discounts + summary.total_refunds;
    DashboardKpis {
        avg_order_value: summary.net_sales / summary.order_count,
        discount_share_of_gross: percent_of(summary.total_discounts, gross),
        total_deductions: deductions,
        deductions_share_of_gross: percent_of(deductions, gross),
        effective_tax_rate: percent_of(summary.total_taxes, gross),
        net_margin: percent_of(summary.net_sales, gross),
        active_studios: studios.len(),
        studios_with_ten_plus_orders: studios
            .iter()
            .filter(|s| s.order_count > ESTABLISHED_STUDIO_ORDERS)
            .count(),
    }
}

fn array_of<'a>(data: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    data.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// One-decimal rounding of the exact binary value, ties away from zero.
///
/// `0.15` is stored just below the tie and rounds to `0.1`; `0.25` is an
/// exact tie and rounds to `0.3`.
fn round1(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    let magnitude = n.abs();
    // Exact expansion: a true tie terminates well inside 60 digits.
    let exact = format!("{:.60}", magnitude);
    let frac = exact.split_once('.').map(|(_, f)| f).unwrap_or("");
    let is_tie = frac.len() > 1
        && frac.as_bytes()[1] == b'5'
        && frac.as_bytes()[2..].iter().all(|&b| b == b'0');
    let rounded = if is_tie {
        ((magnitude * 10.0).floor() + 1.0) / 10.0
    } else {
        format!("{:.1}", magnitude).parse().unwrap_or(0.0)
    };
    if n < 0.0 {
        -rounded
    } else {
        rounded
    }
}
