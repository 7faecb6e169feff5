//! CSV export of studio totals and display formatting helpers.

use std::io;

use chrono::NaiveDate;
use csv::{Terminator, WriterBuilder};

use crate::error::{Result, SalesError};
use crate::models::StudioAggregate;

pub const CSV_HEADER: [&str; 8] = [
    "Studio",
    "Orders",
    "Quantity",
    "Gross Sales",
    "Discounts",
    "Refunds",
    "Taxes",
    "Net Sales",
];

/// Render the valid studios (net sales above zero) as CSV, `\n`-separated.
///
/// Rows carry the finalized studio values unformatted, in report order.
/// Fields are quoted only when they need it.
pub fn studios_csv(studios: &[StudioAggregate]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;
    for s in studios.iter().filter(|s| s.net_sales > 0.0) {
        wtr.write_record([
            s.name.clone(),
            s.order_count.to_string(),
            s.quantity.to_string(),
            s.gross_sales.to_string(),
            s.discounts.to_string(),
            s.refunds.to_string(),
            s.taxes.to_string(),
            s.net_sales.to_string(),
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| SalesError::Io(e.into_error()))?;
    let mut out = String::from_utf8(bytes)
        .map_err(|e| SalesError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    // No terminator after the last row.
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// `shopify-sales-report-YYYY-MM-DD.csv`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("shopify-sales-report-{}.csv", date.format("%Y-%m-%d"))
}

/// Whole-dollar USD, e.g. `$1,235` or `-$40`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// One decimal place and a percent sign, e.g. `12.5%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}
