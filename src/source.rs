//! Paginated order sources and the pull iterator that walks them.
//!
//! A source answers one page request at a time. [`OrderPages`] drives it
//! strictly sequentially: the cursor returned with page *n* is the only input
//! to the request for page *n + 1*.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::date_range::DateBounds;
use crate::error::{Result, SalesError};
use crate::models::RawOrder;

// ---------------------------------------------------------------------------
// OrderSource
// ---------------------------------------------------------------------------

/// One page of orders plus the cursor for the next request.
#[derive(Debug, Clone, Default)]
pub struct OrderPage {
    pub records: Vec<RawOrder>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Anything that can serve orders page by page, filtered to inclusive date bounds.
pub trait OrderSource {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage>;
}

impl<S: OrderSource + ?Sized> OrderSource for &mut S {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage> {
        (**self).fetch_page(cursor, bounds)
    }
}

impl<S: OrderSource + ?Sized> OrderSource for Box<S> {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage> {
        (**self).fetch_page(cursor, bounds)
    }
}

// ---------------------------------------------------------------------------
// OrderPages
// ---------------------------------------------------------------------------

/// Pull iterator over the pages of an [`OrderSource`].
///
/// Yields `Ok(records)` per page and stops after the last page, after the
/// first error (which is yielded once), when a page claims more data but
/// carries no cursor, or when `max_pages` pages have been fetched.
pub struct OrderPages<S> {
    source: S,
    bounds: DateBounds,
    cursor: Option<String>,
    max_pages: Option<usize>,
    fetched_pages: usize,
    fetched_orders: usize,
    done: bool,
}

impl<S: OrderSource> OrderPages<S> {
    pub fn new(source: S, bounds: DateBounds) -> Self {
        Self {
            source,
            bounds,
            cursor: None,
            max_pages: None,
            fetched_pages: 0,
            fetched_orders: 0,
            done: false,
        }
    }

    /// Stop after at most `max_pages` pages.
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn fetched_orders(&self) -> usize {
        self.fetched_orders
    }

    /// Drain every page into one vector, failing on the first error.
    pub fn collect_orders(self) -> Result<Vec<RawOrder>> {
        let mut all = Vec::new();
        for page in self {
            all.extend(page?);
        }
        Ok(all)
    }
}

impl<S: OrderSource> Iterator for OrderPages<S> {
    type Item = Result<Vec<RawOrder>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(max) = self.max_pages {
            if self.fetched_pages >= max {
                tracing::warn!(max_pages = max, "page limit reached, stopping pagination");
                self.done = true;
                return None;
            }
        }

        let page = match self.source.fetch_page(self.cursor.as_deref(), &self.bounds) {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        self.fetched_pages += 1;
        self.fetched_orders += page.records.len();
        tracing::info!("Fetched {} orders so far...", self.fetched_orders);

        match (page.has_more, page.next_cursor) {
            (true, Some(cursor)) => {
                tracing::debug!(cursor = %cursor, "next page");
                self.cursor = Some(cursor);
            }
            (true, None) => {
                tracing::warn!("source reported more pages without a cursor; stopping");
                self.done = true;
            }
            (false, _) => self.done = true,
        }

        Some(Ok(page.records))
    }
}

// ---------------------------------------------------------------------------
// MemorySource
// ---------------------------------------------------------------------------

/// Serves a fixed list of orders in pages of `page_size`.
///
/// Cursors are page offsets rendered as strings. Orders are filtered by the
/// requested bounds on their `createdAt` date; undated orders only pass an
/// unbounded request.
#[derive(Debug, Clone)]
pub struct MemorySource {
    orders: Vec<RawOrder>,
    page_size: usize,
    requests: Vec<Option<String>>,
}

impl MemorySource {
    pub fn new(orders: Vec<RawOrder>, page_size: usize) -> Self {
        Self {
            orders,
            page_size: page_size.max(1),
            requests: Vec::new(),
        }
    }

    /// Cursors received so far, in request order.
    pub fn requests(&self) -> &[Option<String>] {
        &self.requests
    }
}

impl OrderSource for MemorySource {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage> {
        self.requests.push(cursor.map(str::to_string));

        let offset = match cursor {
            None => 0,
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| SalesError::InvalidArgument(format!("Invalid cursor: {c}")))?,
        };

        let matching: Vec<&RawOrder> = self
            .orders
            .iter()
            .filter(|o| in_bounds(o, bounds))
            .collect();

        let end = (offset + self.page_size).min(matching.len());
        let records = matching
            .get(offset..end)
            .map(|page| page.iter().map(|o| (*o).clone()).collect())
            .unwrap_or_default();
        let has_more = end < matching.len();

        Ok(OrderPage {
            records,
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }
}

fn in_bounds(order: &RawOrder, bounds: &DateBounds) -> bool {
    if bounds.is_unbounded() {
        return true;
    }
    order.date().map_or(false, |d| bounds.contains(d))
}

// ---------------------------------------------------------------------------
// JsonFileSource
// ---------------------------------------------------------------------------

/// Offline source backed by an order export on disk.
///
/// Accepts a JSON array of order nodes, an `{ "orders": [...] }` object, or
/// a raw `{ "data": { "orders": { "edges": [...] } } }` GraphQL response. The
/// file is read lazily on the first page request.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    page_size: usize,
    inner: Option<MemorySource>,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P, page_size: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            page_size,
            inner: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<RawOrder>> {
        tracing::info!(path = %self.path.display(), "loading orders from file");
        let contents = fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&contents)?;
        parse_order_export(value)
    }
}

impl OrderSource for JsonFileSource {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage> {
        if self.inner.is_none() {
            let orders = self.load()?;
            self.inner = Some(MemorySource::new(orders, self.page_size));
        }
        match self.inner.as_mut() {
            Some(inner) => inner.fetch_page(cursor, bounds),
            None => Ok(OrderPage::default()),
        }
    }
}

/// Extract order nodes from any of the supported export shapes.
pub fn parse_order_export(value: Value) -> Result<Vec<RawOrder>> {
    let nodes = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let orders = match map.remove("orders") {
                Some(orders) => orders,
                None => map
                    .remove("data")
                    .and_then(|mut d| d.get_mut("orders").map(Value::take))
                    .ok_or_else(|| {
                        SalesError::InvalidArgument(
                            "Order export has neither 'orders' nor 'data.orders'".into(),
                        )
                    })?,
            };
            match orders {
                Value::Array(items) => items,
                Value::Object(mut conn) => match conn.remove("edges") {
                    Some(Value::Array(edges)) => edges
                        .into_iter()
                        .filter_map(|mut e| e.get_mut("node").map(Value::take))
                        .collect(),
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            }
        }
        _ => {
            return Err(SalesError::InvalidArgument(
                "Order export must be a JSON array or object".into(),
            ))
        }
    };

    let mut orders = Vec::with_capacity(nodes.len());
    for node in nodes {
        match serde_json::from_value::<RawOrder>(node) {
            Ok(order) => orders.push(order),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable order record"),
        }
    }
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dated(id: &str, date: &str) -> RawOrder {
        RawOrder {
            id: id.into(),
            created_at: Some(format!("{date}T10:00:00Z")),
            ..RawOrder::default()
        }
    }

    #[test]
    fn memory_source_pages_with_cursors() {
        let orders = (1..=5).map(|i| dated(&i.to_string(), "2024-01-01")).collect();
        let mut source = MemorySource::new(orders, 2);
        let pages: Vec<_> = OrderPages::new(&mut source, DateBounds::unbounded())
            .map(|p| p.unwrap().len())
            .collect();
        assert_eq!(pages, [2, 2, 1]);
        assert_eq!(
            source.requests(),
            &[None, Some("2".to_string()), Some("4".to_string())]
        );
    }

    #[test]
    fn memory_source_filters_by_bounds() {
        let orders = vec![
            dated("a", "2023-12-31"),
            dated("b", "2024-01-01"),
            dated("c", "2024-01-31"),
            dated("d", "2024-02-01"),
        ];
        let bounds = DateBounds {
            start: Some("2024-01-01".into()),
            end: Some("2024-01-31".into()),
        };
        let got = OrderPages::new(MemorySource::new(orders, 10), bounds)
            .collect_orders()
            .unwrap();
        let ids: Vec<_> = got.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn empty_source_yields_one_empty_page() {
        let pages: Vec<_> = OrderPages::new(MemorySource::new(vec![], 10), DateBounds::unbounded())
            .collect();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].as_ref().unwrap().is_empty());
    }

    #[test]
    fn max_pages_bounds_pagination() {
        let orders = (0..10).map(|i| dated(&i.to_string(), "2024-01-01")).collect();
        let got = OrderPages::new(MemorySource::new(orders, 3), DateBounds::unbounded())
            .max_pages(Some(2))
            .collect_orders()
            .unwrap();
        assert_eq!(got.len(), 6);
    }

    struct FailingSource {
        calls: usize,
    }

    impl OrderSource for FailingSource {
        fn fetch_page(&mut self, _: Option<&str>, _: &DateBounds) -> Result<OrderPage> {
            self.calls += 1;
            if self.calls == 1 {
                Ok(OrderPage {
                    records: vec![dated("1", "2024-01-01")],
                    next_cursor: Some("next".into()),
                    has_more: true,
                })
            } else {
                Err(SalesError::GraphQl("Internal error".into()))
            }
        }
    }

    #[test]
    fn iteration_stops_after_first_error() {
        let mut source = FailingSource { calls: 0 };
        let results: Vec<_> = OrderPages::new(&mut source, DateBounds::unbounded()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(source.calls, 2);
    }

    #[test]
    fn has_more_without_cursor_stops() {
        struct NoCursor;
        impl OrderSource for NoCursor {
            fn fetch_page(&mut self, _: Option<&str>, _: &DateBounds) -> Result<OrderPage> {
                Ok(OrderPage {
                    records: vec![],
                    next_cursor: None,
                    has_more: true,
                })
            }
        }
        assert_eq!(OrderPages::new(NoCursor, DateBounds::unbounded()).count(), 1);
    }

    #[test]
    fn export_shapes_are_accepted() {
        let node = json!({ "id": "1", "createdAt": "2024-01-01T00:00:00Z" });
        assert_eq!(parse_order_export(json!([node.clone()])).unwrap().len(), 1);
        assert_eq!(
            parse_order_export(json!({ "orders": [node.clone()] })).unwrap().len(),
            1
        );
        assert_eq!(
            parse_order_export(json!({ "data": { "orders": { "edges": [ { "node": node } ] } } }))
                .unwrap()
                .len(),
            1
        );
        assert!(parse_order_export(json!("nope")).is_err());
        assert!(parse_order_export(json!({ "other": 1 })).is_err());
    }

    #[test]
    fn non_object_records_are_skipped() {
        let orders = parse_order_export(json!([{ "id": "1" }, 42, { "id": 7 }])).unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["1", "7"]);
    }
}
