//! Blocking client for the Shopify Admin GraphQL API.
//!
//! Implements [`OrderSource`] over the `orders` connection: each call posts
//! one page request built by [`OrderQueryBuilder`] and hands back the page's
//! records and `endCursor`. There is no retry here; transport and GraphQL
//! errors surface as [`SalesError`] to the caller.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};

use crate::config;
use crate::date_range::DateBounds;
use crate::error::{Result, SalesError};
use crate::models::RawOrder;
use crate::query::OrderQueryBuilder;
use crate::source::{OrderPage, OrderSource};

/// Connection to one store's Admin GraphQL endpoint.
pub struct ShopifyClient {
    endpoint: String,
    access_token: String,
    page_size: usize,
    client: Client,
}

impl ShopifyClient {
    /// Create a client for `store_domain` (e.g. `my-store.myshopify.com`).
    pub fn new(
        store_domain: &str,
        access_token: &str,
        api_version: &str,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self> {
        if store_domain.trim().is_empty() {
            return Err(SalesError::Config("Shopify store domain is empty".into()));
        }
        if access_token.is_empty() {
            return Err(SalesError::Config("Shopify access token is empty".into()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            endpoint: config::graphql_url(store_domain, api_version),
            access_token: access_token.to_string(),
            page_size,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one GraphQL document and return its `data` object.
    ///
    /// A payload carrying a top-level `errors` array is treated as a failure
    /// even when the HTTP status is 200.
    pub fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(config::ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = resp.status();
        let body: Value = resp.json()?;
        extract_data(status.as_u16(), body)
    }
}

impl OrderSource for ShopifyClient {
    fn fetch_page(&mut self, cursor: Option<&str>, bounds: &DateBounds) -> Result<OrderPage> {
        let (query, variables) = OrderQueryBuilder::new()
            .first(self.page_size)
            .after(cursor)
            .bounds(bounds)
            .build();
        let data = self.execute(&query, variables)?;
        parse_orders_page(data)
    }
}

/// Unwrap a GraphQL response body, turning `errors` and non-2xx into failures.
pub fn extract_data(status: u16, mut body: Value) -> Result<Value> {
    if let Some(errors) = body.get("errors").filter(|e| !e.is_null()) {
        let message = graphql_error_message(errors);
        tracing::error!(status, errors = %errors, "Shopify GraphQL errors");
        return Err(SalesError::GraphQl(message));
    }
    if !(200..300).contains(&status) {
        return Err(SalesError::GraphQl(format!(
            "Shopify returned HTTP status {status}"
        )));
    }
    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(SalesError::GraphQl("Response has no data".into())),
    }
}

fn graphql_error_message(errors: &Value) -> String {
    match errors {
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                "Shopify GraphQL Error".to_string()
            } else {
                messages.join("; ")
            }
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read one `orders` connection page out of a response `data` object.
///
/// Malformed fields inside a node fall back to zero or empty (see
/// [`RawOrder`]); only nodes that are not order objects at all are skipped,
/// with a warning.
pub fn parse_orders_page(mut data: Value) -> Result<OrderPage> {
    let mut orders = match data.get_mut("orders").map(Value::take) {
        Some(orders) if orders.is_object() => orders,
        _ => return Err(SalesError::GraphQl("Response is missing 'orders'".into())),
    };

    let edges = match orders.get_mut("edges").map(Value::take) {
        Some(Value::Array(edges)) => edges,
        _ => Vec::new(),
    };

    let mut records = Vec::with_capacity(edges.len());
    for mut edge in edges {
        let Some(node) = edge.get_mut("node").map(Value::take) else {
            continue;
        };
        match serde_json::from_value::<RawOrder>(node) {
            Ok(order) => records.push(order),
            Err(e) => tracing::warn!(error = %e, "skipping unreadable order node"),
        }
    }

    let page_info = orders.get("pageInfo");
    let has_more = page_info
        .and_then(|p| p.get("hasNextPage"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let next_cursor = page_info
        .and_then(|p| p.get("endCursor"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(OrderPage {
        records,
        next_cursor,
        has_more,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_missing_credentials() {
        let err = ShopifyClient::new("", "token", "2024-01", 50, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, SalesError::Config(_)));
        let err = ShopifyClient::new("shop.myshopify.com", "", "2024-01", 50, Duration::from_secs(5))
            .err()
            .unwrap();
        assert!(matches!(err, SalesError::Config(_)));
    }

    #[test]
    fn endpoint_uses_api_version() {
        let client =
            ShopifyClient::new("shop.myshopify.com", "t", "2024-04", 50, Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://shop.myshopify.com/admin/api/2024-04/graphql.json"
        );
    }
}
