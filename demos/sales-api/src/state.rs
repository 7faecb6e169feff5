/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async sales SDK. Dispatches the blocking Shopify pagination to a
    /// thread pool internally; requests are served one at a time.
    pub sdk: shopify_sales_sdk::AsyncSalesSdk,
}
