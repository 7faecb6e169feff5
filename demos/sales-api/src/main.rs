mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use state::AppState;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // RUST_LOG overrides the default level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _tracing = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init();

    let mut builder = shopify_sales_sdk::AsyncSalesSdk::builder().from_env();
    if let Ok(path) = std::env::var("SALES_OFFLINE_FILE") {
        tracing::info!(path = %path, "Serving orders from offline export");
        builder = builder.offline_file(path);
    }
    let sdk = builder
        .build()
        .await
        .expect("Failed to initialize Shopify sales SDK");
    tracing::info!("SDK ready.");

    let state = Arc::new(AppState { sdk });

    let app = Router::new()
        .route("/api/shopify/orders", get(routes::orders::get_orders))
        .route("/api/shopify/dashboard", get(routes::dashboard::get_dashboard))
        .route("/api/shopify/export.csv", get(routes::export::export_csv))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("SALES_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
