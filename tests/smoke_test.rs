//! Live smoke test against a real Shopify store.
//!
//! Reads `SHOPIFY_STORE_DOMAIN` and `SHOPIFY_ADMIN_API_ACCESS_TOKEN` from the
//! environment and runs every window through the full pipeline.
//!
//! Run with:
//! ```sh
//! cargo test -- --ignored --nocapture
//! ```

use shopify_sales_sdk::models::ReadModel;
use shopify_sales_sdk::{DateRangeRequest, SalesSdkBuilder};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

#[derive(Default)]
struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let sdk = SalesSdkBuilder::from_env().build().unwrap();
    let mut c = Counters::default();

    for range in ["30d", "90d", "ytd", "all"] {
        section(&format!("Report: {range}"));
        let request = DateRangeRequest::range(range);

        let report = sdk.report(&request).unwrap();
        let s = &report.summary;
        c.check(
            "summary is finite",
            s.net_sales.is_finite() && s.total_gross_sales.is_finite(),
            &format!("orders={}, net={:.2}", s.order_count, s.net_sales),
        );
        c.check(
            "net = gross - discounts - refunds",
            (s.net_sales - (s.total_gross_sales - s.total_discounts - s.total_refunds)).abs()
                < 1e-6,
            "",
        );
        let daily_orders: u64 = report.by_date.iter().map(|d| d.order_count).sum();
        c.check(
            "daily order counts add up",
            daily_orders == s.order_count,
            &format!("daily={daily_orders}"),
        );
        c.check(
            "studios sorted by net sales",
            report
                .studios
                .windows(2)
                .all(|w| w[0].net_sales >= w[1].net_sales),
            &format!("studios={}", report.studios.len()),
        );
        if let (Some(start), Some(end)) = (&report.date_range.start, &report.date_range.end) {
            c.check("date range ordered", start <= end, &format!("{start}..{end}"));
        }

        let model = ReadModel::from_report(&report);
        c.check(
            "read model has five waterfall steps",
            model.waterfall_data.len() == 5,
            "",
        );
    }

    section("Display");
    let display = format!("{}", sdk);
    c.check(
        "Display impl",
        display.contains("SalesSdk"),
        &format!("display={}", display),
    );

    section("SMOKE TEST COMPLETE");
    eprintln!("  Passed:  {}", c.pass);
    eprintln!("  Failed:  {}", c.fail);

    assert_eq!(c.fail, 0, "{} smoke test checks failed", c.fail);
}
