//! Raw order nodes as returned by the Admin GraphQL `orders` query.
//!
//! Every field deserializes from any JSON shape. A field of the wrong shape
//! falls back to its default (`None`, empty, zero) instead of failing the
//! whole order, and list elements that cannot be read are skipped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::numeric;

// ---------------------------------------------------------------------------
// Money: Shopify `MoneyBag` wrapper
// ---------------------------------------------------------------------------

/// A Shopify `MoneyBag` (`{ shopMoney: { amount, currencyCode } }`).
///
/// `amount` is kept untyped: the Admin API sends decimal strings, but any
/// shape must deserialize so that coercion can happen in one place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBag {
    #[serde(default, deserialize_with = "lenient")]
    pub shop_money: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    #[serde(default)]
    pub amount: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub currency_code: Option<String>,
}

impl MoneyBag {
    pub fn amount(&self) -> f64 {
        self.shop_money
            .as_ref()
            .map(|m| numeric::normalize(&m.amount))
            .unwrap_or(0.0)
    }
}

/// Normalized amount of an optional money field; missing at any level is zero.
pub fn amount_of(bag: Option<&MoneyBag>) -> f64 {
    bag.map(MoneyBag::amount).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Edges: GraphQL connection wrapper
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Edges<T> {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub edges: Vec<Edge<T>>,
}

impl<T> Default for Edges<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Edges<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    pub fn from_nodes(nodes: Vec<T>) -> Self {
        Self {
            edges: nodes.into_iter().map(|node| Edge { node }).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawOrder
// ---------------------------------------------------------------------------

/// One order node as returned by the Admin GraphQL `orders` query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_price_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_discounts_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_refunded_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_tax_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_shipping_price_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient")]
    pub line_items: Edges<LineItem>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub refunds: Vec<Refund>,
}

impl RawOrder {
    /// Calendar date (`YYYY-MM-DD`) of `createdAt`, if present.
    pub fn date(&self) -> Option<&str> {
        self.created_at
            .as_deref()
            .filter(|ts| !ts.is_empty())
            .map(|ts| ts.split('T').next().unwrap_or(ts))
    }

    pub fn gross(&self) -> f64 {
        amount_of(self.total_price_set.as_ref())
    }

    pub fn discounts(&self) -> f64 {
        amount_of(self.total_discounts_set.as_ref())
    }

    pub fn refunded(&self) -> f64 {
        amount_of(self.total_refunded_set.as_ref())
    }

    pub fn taxes(&self) -> f64 {
        amount_of(self.total_tax_set.as_ref())
    }

    pub fn shipping(&self) -> f64 {
        amount_of(self.total_shipping_price_set.as_ref())
    }
}

// ---------------------------------------------------------------------------
// LineItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<ProductRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_total_set: Option<MoneyBag>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub discount_allocations: Vec<DiscountAllocation>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub tax_lines: Vec<TaxLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountAllocation {
    #[serde(default, deserialize_with = "lenient")]
    pub allocated_amount_set: Option<MoneyBag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    #[serde(default, deserialize_with = "lenient")]
    pub price_set: Option<MoneyBag>,
}

impl LineItem {
    /// Studio key: product title, then line-item title, then [`UNKNOWN_PRODUCT`].
    ///
    /// [`UNKNOWN_PRODUCT`]: crate::config::UNKNOWN_PRODUCT
    pub fn studio_key(&self) -> &str {
        non_empty(self.product.as_ref().and_then(|p| p.title.as_deref()))
            .or_else(|| non_empty(self.title.as_deref()))
            .unwrap_or(crate::config::UNKNOWN_PRODUCT)
    }

    pub fn gross(&self) -> f64 {
        amount_of(self.original_total_set.as_ref())
    }

    pub fn discounts(&self) -> f64 {
        self.discount_allocations
            .iter()
            .map(|d| amount_of(d.allocated_amount_set.as_ref()))
            .sum()
    }

    pub fn taxes(&self) -> f64 {
        self.tax_lines
            .iter()
            .map(|t| amount_of(t.price_set.as_ref()))
            .sum()
    }

    pub fn quantity(&self) -> f64 {
        numeric::normalize(&self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Refund
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub refund_line_items: Edges<RefundLineItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundLineItem {
    #[serde(default, deserialize_with = "lenient")]
    pub line_item: Option<RefundedLineItemRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub subtotal_set: Option<MoneyBag>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundedLineItemRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<ProductRef>,
}

impl RefundLineItem {
    /// Studio key of the refunded line item: its product title or [`UNKNOWN_PRODUCT`].
    ///
    /// Unlike [`LineItem::studio_key`] there is no line-item title to fall back on.
    ///
    /// [`UNKNOWN_PRODUCT`]: crate::config::UNKNOWN_PRODUCT
    pub fn studio_key(&self) -> &str {
        non_empty(
            self.line_item
                .as_ref()
                .and_then(|li| li.product.as_ref())
                .and_then(|p| p.title.as_deref()),
        )
        .unwrap_or(crate::config::UNKNOWN_PRODUCT)
    }

    pub fn subtotal(&self) -> f64 {
        amount_of(self.subtotal_set.as_ref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Shape-tolerant field deserializers
// ---------------------------------------------------------------------------

/// Read the field as `T`, or fall back to `T::default()` on any shape mismatch.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Read a list, dropping elements that do not fit `T`. Non-arrays are empty.
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Strings pass through and numbers are rendered as text; anything else is `None`.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_admin_api_node() {
        let node = json!({
            "id": "gid://shopify/Order/1",
            "name": "#1001",
            "createdAt": "2024-01-15T12:34:56Z",
            "totalPriceSet": { "shopMoney": { "amount": "100.00", "currencyCode": "USD" } },
            "totalDiscountsSet": { "shopMoney": { "amount": "10.00" } },
            "totalRefundedSet": { "shopMoney": { "amount": "0.00" } },
            "totalTaxSet": null,
            "lineItems": { "edges": [ { "node": {
                "id": "gid://shopify/LineItem/1",
                "title": "Pottery class",
                "quantity": 2,
                "product": { "id": "gid://shopify/Product/9", "title": "Clay Studio" },
                "originalTotalSet": { "shopMoney": { "amount": "100.00" } },
                "discountAllocations": [
                    { "allocatedAmountSet": { "shopMoney": { "amount": "6.00" } } },
                    { "allocatedAmountSet": { "shopMoney": { "amount": "4.00" } } }
                ],
                "taxLines": [ { "priceSet": { "shopMoney": { "amount": "5.00" } } } ]
            } } ] },
            "refunds": null
        });

        let order: RawOrder = serde_json::from_value(node).unwrap();
        assert_eq!(order.date(), Some("2024-01-15"));
        assert_eq!(order.gross(), 100.0);
        assert_eq!(order.discounts(), 10.0);
        assert_eq!(order.taxes(), 0.0);
        assert_eq!(order.shipping(), 0.0);
        assert!(order.refunds.is_empty());

        let item = order.line_items.nodes().next().unwrap();
        assert_eq!(item.studio_key(), "Clay Studio");
        assert_eq!(item.discounts(), 10.0);
        assert_eq!(item.taxes(), 5.0);
        assert_eq!(item.quantity(), 2.0);
    }

    #[test]
    fn studio_key_falls_back_through_titles() {
        let titled = LineItem {
            title: Some("Gift card".into()),
            product: Some(ProductRef::default()),
            ..LineItem::default()
        };
        assert_eq!(titled.studio_key(), "Gift card");
        assert_eq!(LineItem::default().studio_key(), "Unknown Product");
        assert_eq!(RefundLineItem::default().studio_key(), "Unknown Product");
    }

    #[test]
    fn malformed_amounts_are_zero() {
        let bag: MoneyBag =
            serde_json::from_value(json!({ "shopMoney": { "amount": "n/a" } })).unwrap();
        assert_eq!(bag.amount(), 0.0);
        let empty: MoneyBag = serde_json::from_value(json!({ "shopMoney": null })).unwrap();
        assert_eq!(empty.amount(), 0.0);
        assert_eq!(amount_of(None), 0.0);
    }

    #[test]
    fn wrong_shaped_fields_keep_the_order() {
        let node = json!({
            "id": 7,
            "name": ["#7"],
            "createdAt": "2024-01-15T00:00:00Z",
            "totalPriceSet": { "shopMoney": { "amount": "100" } },
            "totalDiscountsSet": "10.00",
            "totalTaxSet": 5,
            "totalShippingPriceSet": { "shopMoney": "3" },
            "lineItems": { "edges": [
                { "node": {
                    "title": 42,
                    "product": "Clay Studio",
                    "originalTotalSet": { "shopMoney": { "amount": "100" } },
                    "discountAllocations": "none",
                    "taxLines": [ 1, { "priceSet": { "shopMoney": { "amount": "2" } } } ]
                } },
                "not an edge"
            ] },
            "refunds": { "oops": true }
        });

        let order: RawOrder = serde_json::from_value(node).unwrap();
        assert_eq!(order.id, "7");
        assert_eq!(order.name, None);
        assert_eq!(order.gross(), 100.0);
        assert_eq!(order.discounts(), 0.0);
        assert_eq!(order.taxes(), 0.0);
        assert_eq!(order.shipping(), 0.0);
        assert!(order.refunds.is_empty());

        let items: Vec<&LineItem> = order.line_items.nodes().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].studio_key(), "42");
        assert_eq!(items[0].gross(), 100.0);
        assert_eq!(items[0].discounts(), 0.0);
        assert_eq!(items[0].taxes(), 2.0);
    }
}
