use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "2024-01";

/// Orders requested per GraphQL page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Line items and refund line items requested per order.
pub const NESTED_PAGE_SIZE: usize = 50;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const STORE_DOMAIN_ENV: &str = "SHOPIFY_STORE_DOMAIN";
pub const ACCESS_TOKEN_ENV: &str = "SHOPIFY_ADMIN_API_ACCESS_TOKEN";
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Group key used when a line item has neither a product title nor its own title.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Display name substituted for studios with an empty name in the read model.
pub const UNKNOWN_STUDIO: &str = "Unknown Studio";

/// Date/month key for orders whose `createdAt` is missing.
pub const UNKNOWN_PERIOD: &str = "unknown";

pub fn graphql_url(store_domain: &str, api_version: &str) -> String {
    let domain = store_domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://{}/admin/api/{}/graphql.json", domain, api_version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_url_strips_scheme_and_trailing_slash() {
        assert_eq!(
            graphql_url("https://studio.myshopify.com/", "2024-01"),
            "https://studio.myshopify.com/admin/api/2024-01/graphql.json"
        );
        assert_eq!(
            graphql_url("studio.myshopify.com", DEFAULT_API_VERSION),
            "https://studio.myshopify.com/admin/api/2024-01/graphql.json"
        );
    }
}
