//! Builder for the Admin GraphQL `orders` query.
//!
//! Caller-supplied values (page size, cursor, search filter) are sent as
//! GraphQL variables, never interpolated into the document. Date filters use
//! Shopify's search syntax (`created_at:>=2024-01-01`) and are combined with
//! `AND`. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use shopify_sales_sdk::OrderQueryBuilder;
//! let (query, variables) = OrderQueryBuilder::new()
//!     .first(50)
//!     .created_at_gte("2024-01-01")
//!     .created_at_lte("2024-01-31")
//!     .build();
//! assert_eq!(variables["query"], "created_at:>=2024-01-01 AND created_at:<=2024-01-31");
//! ```

use serde_json::{json, Value};

use crate::config::{DEFAULT_PAGE_SIZE, NESTED_PAGE_SIZE};
use crate::date_range::DateBounds;

/// Builds the `orders` query document and its variables.
pub struct OrderQueryBuilder {
    first: usize,
    nested_first: usize,
    after: Option<String>,
    search_terms: Vec<String>,
}

impl Default for OrderQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderQueryBuilder {
    pub fn new() -> Self {
        Self {
            first: DEFAULT_PAGE_SIZE,
            nested_first: NESTED_PAGE_SIZE,
            after: None,
            search_terms: Vec::new(),
        }
    }

    /// Orders per page.
    pub fn first(&mut self, n: usize) -> &mut Self {
        self.first = n.max(1);
        self
    }

    /// Line items and refund line items fetched per order.
    pub fn nested_first(&mut self, n: usize) -> &mut Self {
        self.nested_first = n.max(1);
        self
    }

    /// Resume after the given page cursor.
    pub fn after(&mut self, cursor: Option<&str>) -> &mut Self {
        self.after = cursor.map(str::to_string);
        self
    }

    /// Add a raw search term, e.g. `financial_status:paid`.
    pub fn where_term(&mut self, term: &str) -> &mut Self {
        if !term.trim().is_empty() {
            self.search_terms.push(term.trim().to_string());
        }
        self
    }

    /// Add `created_at:>={date}`.
    pub fn created_at_gte(&mut self, date: &str) -> &mut Self {
        self.search_terms
            .push(format!("created_at:>={}", search_value(date)));
        self
    }

    /// Add `created_at:<={date}`.
    pub fn created_at_lte(&mut self, date: &str) -> &mut Self {
        self.search_terms
            .push(format!("created_at:<={}", search_value(date)));
        self
    }

    /// Add both sides of inclusive date bounds; unbounded sides are skipped.
    pub fn bounds(&mut self, bounds: &DateBounds) -> &mut Self {
        if let Some(start) = bounds.start.as_deref() {
            self.created_at_gte(start);
        }
        if let Some(end) = bounds.end.as_deref() {
            self.created_at_lte(end);
        }
        self
    }

    /// The combined search filter, or `None` when no term was added.
    pub fn search_filter(&self) -> Option<String> {
        if self.search_terms.is_empty() {
            None
        } else {
            Some(self.search_terms.join(" AND "))
        }
    }

    /// Build the final query document and variables.
    ///
    /// Returns `(query, variables)` ready to POST as `{ query, variables }`.
    pub fn build(&self) -> (String, Value) {
        let n = self.nested_first;
        let query = format!(
            r#"query getOrders($first: Int!, $after: String, $query: String) {{
  orders(first: $first, after: $after, query: $query) {{
    edges {{
      node {{
        id
        name
        createdAt
        totalPriceSet {{ shopMoney {{ amount currencyCode }} }}
        totalDiscountsSet {{ shopMoney {{ amount }} }}
        totalRefundedSet {{ shopMoney {{ amount }} }}
        totalTaxSet {{ shopMoney {{ amount }} }}
        totalShippingPriceSet {{ shopMoney {{ amount }} }}
        lineItems(first: {n}) {{
          edges {{
            node {{
              id
              title
              quantity
              product {{ id title }}
              originalTotalSet {{ shopMoney {{ amount }} }}
              discountAllocations {{ allocatedAmountSet {{ shopMoney {{ amount }} }} }}
              taxLines {{ priceSet {{ shopMoney {{ amount }} }} }}
            }}
          }}
        }}
        refunds {{
          id
          createdAt
          refundLineItems(first: {n}) {{
            edges {{
              node {{
                lineItem {{ id product {{ title }} }}
                subtotalSet {{ shopMoney {{ amount }} }}
              }}
            }}
          }}
        }}
      }}
    }}
    pageInfo {{ hasNextPage endCursor }}
  }}
}}"#
        );

        let variables = json!({
            "first": self.first,
            "after": self.after,
            "query": self.search_filter(),
        });

        (query, variables)
    }
}

/// Quote a search value unless it is a plain date/time token.
fn search_value(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.' | '+'));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}
