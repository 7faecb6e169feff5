//! Shared order fixtures for the sales SDK integration tests.
//!
//! Orders are built as GraphQL-shaped JSON (`totalPriceSet.shopMoney.amount`,
//! `lineItems.edges[].node`, ...) and deserialized through the same
//! [`RawOrder`] path the client uses.

#![allow(dead_code)]

use serde_json::{json, Value};
use shopify_sales_sdk::models::RawOrder;

/// `{ "shopMoney": { "amount": ... } }`
pub fn money(amount: impl Into<Value>) -> Value {
    json!({ "shopMoney": { "amount": amount.into(), "currencyCode": "USD" } })
}

/// A line item for `product` with gross `amount`, `discount`, `tax` and `quantity`.
pub fn line_item(id: &str, product: &str, amount: f64, discount: f64, tax: f64, quantity: u32) -> Value {
    json!({
        "id": id,
        "title": format!("{product} ticket"),
        "quantity": quantity,
        "product": { "id": format!("gid://shopify/Product/{product}"), "title": product },
        "originalTotalSet": money(amount.to_string()),
        "discountAllocations": [ { "allocatedAmountSet": money(discount.to_string()) } ],
        "taxLines": [ { "priceSet": money(tax.to_string()) } ],
    })
}

/// A refund line against a line item of `product`.
pub fn refund(product: &str, amount: f64) -> Value {
    json!({
        "id": format!("gid://shopify/Refund/{product}"),
        "createdAt": "2024-01-20T00:00:00Z",
        "refundLineItems": { "edges": [ {
            "node": {
                "lineItem": { "id": "li", "product": { "title": product } },
                "subtotalSet": money(amount.to_string()),
            }
        } ] },
    })
}

/// Builder for one raw order node.
pub struct OrderFixture {
    node: Value,
}

impl OrderFixture {
    pub fn new(id: &str, created_at: &str) -> Self {
        Self {
            node: json!({
                "id": id,
                "name": format!("#{id}"),
                "createdAt": created_at,
                "totalPriceSet": money("0"),
                "totalDiscountsSet": money("0"),
                "totalRefundedSet": money("0"),
                "totalTaxSet": money("0"),
                "totalShippingPriceSet": money("0"),
                "lineItems": { "edges": [] },
                "refunds": [],
            }),
        }
    }

    pub fn totals(mut self, gross: f64, discounts: f64, refunded: f64, tax: f64, shipping: f64) -> Self {
        self.node["totalPriceSet"] = money(gross.to_string());
        self.node["totalDiscountsSet"] = money(discounts.to_string());
        self.node["totalRefundedSet"] = money(refunded.to_string());
        self.node["totalTaxSet"] = money(tax.to_string());
        self.node["totalShippingPriceSet"] = money(shipping.to_string());
        self
    }

    pub fn line(mut self, item: Value) -> Self {
        if let Some(edges) = self.node["lineItems"]["edges"].as_array_mut() {
            edges.push(json!({ "node": item }));
        }
        self
    }

    pub fn refund(mut self, refund: Value) -> Self {
        if let Some(refunds) = self.node["refunds"].as_array_mut() {
            refunds.push(refund);
        }
        self
    }

    pub fn json(self) -> Value {
        self.node
    }

    pub fn build(self) -> RawOrder {
        serde_json::from_value(self.node).unwrap()
    }
}

/// Two orders over two days, both touching "Studio X".
///
/// * order 1 (2024-01-15): gross 100, discounts 10, refunded 20, tax 5;
///   one Studio X line of 100 × 2 and a 20 refund against Studio X.
/// * order 2 (2024-01-16): gross 50; one Studio X line of 50 × 1.
pub fn two_order_scenario() -> Vec<RawOrder> {
    vec![
        OrderFixture::new("gid://shopify/Order/1", "2024-01-15T10:00:00Z")
            .totals(100.0, 10.0, 20.0, 5.0, 0.0)
            .line(line_item("li-1", "Studio X", 100.0, 10.0, 5.0, 2))
            .refund(refund("Studio X", 20.0))
            .build(),
        OrderFixture::new("gid://shopify/Order/2", "2024-01-16T09:30:00Z")
            .totals(50.0, 0.0, 0.0, 0.0, 0.0)
            .line(line_item("li-2", "Studio X", 50.0, 0.0, 0.0, 1))
            .build(),
    ]
}

/// A spread of orders across three months and three studios.
pub fn quarter_of_orders() -> Vec<RawOrder> {
    vec![
        OrderFixture::new("o-1", "2024-01-05T12:00:00Z")
            .totals(200.0, 20.0, 0.0, 16.0, 10.0)
            .line(line_item("a", "Pottery", 120.0, 20.0, 9.6, 1))
            .line(line_item("b", "Weaving", 80.0, 0.0, 6.4, 2))
            .build(),
        OrderFixture::new("o-2", "2024-02-11T08:00:00Z")
            .totals(90.0, 0.0, 30.0, 7.2, 5.0)
            .line(line_item("c", "Pottery", 90.0, 0.0, 7.2, 1))
            .refund(refund("Pottery", 30.0))
            .build(),
        OrderFixture::new("o-3", "2024-02-28T18:45:00Z")
            .totals(60.0, 5.0, 0.0, 4.8, 0.0)
            .line(line_item("d", "Glass", 60.0, 5.0, 4.8, 3))
            .build(),
        OrderFixture::new("o-4", "2024-03-02T10:15:00Z")
            .totals(40.0, 0.0, 0.0, 3.2, 0.0)
            .line(line_item("e", "Weaving", 40.0, 0.0, 3.2, 1))
            .build(),
    ]
}
