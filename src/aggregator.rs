//! Single-pass rollup of raw orders into store, studio, daily and monthly totals.
//!
//! [`OrderAggregator`] is a two-phase accumulator: [`push`](OrderAggregator::push)
//! folds one order at a time (so pages can be consumed as they arrive), and
//! [`finish`](OrderAggregator::finish) consumes it to derive order counts and
//! net sales and to sort every grouping.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::config::UNKNOWN_PERIOD;
use crate::error::Result;
use crate::models::{
    DailyAggregate, DateRange, MonthlyAggregate, RawOrder, SalesReport, StudioAggregate,
    StudioOrderLine, Summary,
};

// ---------------------------------------------------------------------------
// Accumulating-phase records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Totals {
    gross: f64,
    discounts: f64,
    refunds: f64,
    taxes: f64,
    shipping: f64,
}

impl Totals {
    fn add(&mut self, other: &Totals) {
        self.gross += other.gross;
        self.discounts += other.discounts;
        self.refunds += other.refunds;
        self.taxes += other.taxes;
        self.shipping += other.shipping;
    }
}

/// Per-day or per-month bucket. Net sales is accumulated order by order.
#[derive(Debug, Clone, Default)]
struct PeriodBucket {
    totals: Totals,
    net_sales: f64,
    order_count: u64,
}

impl PeriodBucket {
    fn add_order(&mut self, order: &Totals) {
        self.totals.add(order);
        self.net_sales += order.gross - order.discounts - order.refunds;
        self.order_count += 1;
    }

    fn merge(&mut self, other: PeriodBucket) {
        self.totals.add(&other.totals);
        self.net_sales += other.net_sales;
        self.order_count += other.order_count;
    }
}

#[derive(Debug, Clone)]
struct StudioBucket {
    name: String,
    gross: f64,
    discounts: f64,
    refunds: f64,
    taxes: f64,
    quantity: f64,
    order_ids: HashSet<String>,
    orders: Vec<StudioOrderLine>,
}

impl StudioBucket {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            gross: 0.0,
            discounts: 0.0,
            refunds: 0.0,
            taxes: 0.0,
            quantity: 0.0,
            order_ids: HashSet::new(),
            orders: Vec::new(),
        }
    }

    fn finalize(self) -> StudioAggregate {
        StudioAggregate {
            net_sales: self.gross - self.discounts - self.refunds,
            order_count: self.order_ids.len() as u64,
            name: self.name,
            gross_sales: self.gross,
            discounts: self.discounts,
            refunds: self.refunds,
            taxes: self.taxes,
            quantity: self.quantity,
            orders: self.orders,
        }
    }
}

// ---------------------------------------------------------------------------
// OrderAggregator
// ---------------------------------------------------------------------------

/// Streaming accumulator for one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct OrderAggregator {
    totals: Totals,
    order_count: u64,
    studios: Vec<StudioBucket>,
    studio_index: HashMap<String, usize>,
    daily: BTreeMap<String, PeriodBucket>,
    monthly: BTreeMap<String, PeriodBucket>,
}

impl OrderAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders folded in so far.
    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    /// Fold one order into every grouping.
    pub fn push(&mut self, order: &RawOrder) {
        let date = order.date().unwrap_or(UNKNOWN_PERIOD);
        let month = month_key(date);

        let order_totals = Totals {
            gross: order.gross(),
            discounts: order.discounts(),
            refunds: order.refunded(),
            taxes: order.taxes(),
            shipping: order.shipping(),
        };

        self.totals.add(&order_totals);
        self.order_count += 1;

        self.daily
            .entry(date.to_string())
            .or_default()
            .add_order(&order_totals);
        self.monthly
            .entry(month)
            .or_default()
            .add_order(&order_totals);

        for item in order.line_items.nodes() {
            let gross = item.gross();
            let studio = self.studio_entry(item.studio_key());
            studio.gross += gross;
            studio.discounts += item.discounts();
            studio.taxes += item.taxes();
            studio.quantity += item.quantity();
            studio.order_ids.insert(order.id.clone());
            studio.orders.push(StudioOrderLine {
                order_id: order.id.clone(),
                order_name: order.name.clone(),
                date: order.created_at.clone(),
                amount: gross,
            });
        }

        // Refunds only attach to studios already seen through a line item.
        for refund in &order.refunds {
            for line in refund.refund_line_items.nodes() {
                let key = line.studio_key();
                match self.studio_index.get(key) {
                    Some(&idx) => self.studios[idx].refunds += line.subtotal(),
                    None => tracing::debug!(
                        studio = key,
                        order = %order.id,
                        "dropping refund for studio without line items"
                    ),
                }
            }
        }
    }

    /// Fold every order of an iterator.
    pub fn extend<'a, I>(&mut self, orders: I)
    where
        I: IntoIterator<Item = &'a RawOrder>,
    {
        for order in orders {
            self.push(order);
        }
    }

    /// Combine another partial accumulator into this one.
    ///
    /// Sums are added and studio order-id sets are unioned, so merging the
    /// accumulators of disjoint order sets gives the same counts as pushing
    /// every order into one accumulator.
    pub fn merge(&mut self, other: OrderAggregator) {
        self.totals.add(&other.totals);
        self.order_count += other.order_count;

        for (date, bucket) in other.daily {
            self.daily.entry(date).or_default().merge(bucket);
        }
        for (month, bucket) in other.monthly {
            self.monthly.entry(month).or_default().merge(bucket);
        }

        for theirs in other.studios {
            let ours = self.studio_entry(&theirs.name);
            ours.gross += theirs.gross;
            ours.discounts += theirs.discounts;
            ours.refunds += theirs.refunds;
            ours.taxes += theirs.taxes;
            ours.quantity += theirs.quantity;
            ours.order_ids.extend(theirs.order_ids);
            ours.orders.extend(theirs.orders);
        }
    }

    /// Finalize the run into a sorted [`SalesReport`].
    pub fn finish(self) -> SalesReport {
        if self.order_count == 0 {
            return SalesReport::empty();
        }

        let summary = Summary {
            total_gross_sales: self.totals.gross,
            total_discounts: self.totals.discounts,
            total_refunds: self.totals.refunds,
            total_taxes: self.totals.taxes,
            total_shipping: self.totals.shipping,
            net_sales: self.totals.gross - self.totals.discounts - self.totals.refunds,
            order_count: self.order_count,
        };

        let mut studios: Vec<StudioAggregate> = self
            .studios
            .into_iter()
            .map(StudioBucket::finalize)
            .collect();
        studios.sort_by(|a, b| by_net_sales_desc(a.net_sales, b.net_sales));

        // BTreeMap iteration is already ascending by key.
        let by_date: Vec<DailyAggregate> = self
            .daily
            .into_iter()
            .map(|(date, b)| DailyAggregate {
                date,
                gross_sales: b.totals.gross,
                discounts: b.totals.discounts,
                refunds: b.totals.refunds,
                taxes: b.totals.taxes,
                shipping: b.totals.shipping,
                net_sales: b.net_sales,
                order_count: b.order_count,
            })
            .collect();

        let by_month: Vec<MonthlyAggregate> = self
            .monthly
            .into_iter()
            .map(|(month, b)| MonthlyAggregate {
                month,
                gross_sales: b.totals.gross,
                discounts: b.totals.discounts,
                refunds: b.totals.refunds,
                taxes: b.totals.taxes,
                shipping: b.totals.shipping,
                net_sales: b.net_sales,
                order_count: b.order_count,
            })
            .collect();

        let date_range = date_range_of(&by_date);

        SalesReport {
            summary,
            studios,
            by_date,
            by_month,
            date_range,
        }
    }

    fn studio_entry(&mut self, name: &str) -> &mut StudioBucket {
        let idx = match self.studio_index.get(name) {
            Some(&idx) => idx,
            None => {
                self.studios.push(StudioBucket::new(name));
                let idx = self.studios.len() - 1;
                self.studio_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.studios[idx]
    }
}

/// Aggregate an in-memory batch of orders.
pub fn aggregate<'a, I>(orders: I) -> SalesReport
where
    I: IntoIterator<Item = &'a RawOrder>,
{
    let mut aggregator = OrderAggregator::new();
    aggregator.extend(orders);
    aggregator.finish()
}

/// Aggregate a stream of fetched pages, stopping at the first upstream error.
///
/// Pages are folded as they arrive; the error is returned unchanged and no
/// partial report is produced.
pub fn aggregate_pages<I>(pages: I) -> Result<SalesReport>
where
    I: IntoIterator<Item = Result<Vec<RawOrder>>>,
{
    let mut aggregator = OrderAggregator::new();
    for page in pages {
        let page = page?;
        aggregator.extend(&page);
        tracing::debug!(orders = aggregator.order_count(), "aggregated page");
    }
    Ok(aggregator.finish())
}

/// Descending comparison that treats `-0.0` and `0.0` (and any NaN) as equal,
/// so a stable sort keeps first-seen order for them.
pub(crate) fn by_net_sales_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn month_key(date: &str) -> String {
    if date == UNKNOWN_PERIOD {
        return UNKNOWN_PERIOD.to_string();
    }
    date.chars().take(7).collect()
}

fn date_range_of(by_date: &[DailyAggregate]) -> DateRange {
    let mut dated = by_date
        .iter()
        .filter(|d| NaiveDate::parse_from_str(&d.date, "%Y-%m-%d").is_ok());
    let first = dated.next();
    let last = dated.last().or(first);
    DateRange {
        start: first.map(|d| d.date.clone()),
        end: last.map(|d| d.date.clone()),
    }
}
