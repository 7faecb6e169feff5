//! Shopify sales analytics SDK for Rust.
//!
//! Pages through a store's orders via the Admin GraphQL API and rolls them up
//! into store-wide totals plus per-studio (product line), per-day and
//! per-month breakdowns. A second stage derives chart-ready series (waterfall,
//! revenue share, monthly trend) from the rolled-up report.
//!
//! # Quick start
//!
//! ```no_run
//! use shopify_sales_sdk::{DateRangeRequest, SalesSdk};
//!
//! let sdk = SalesSdk::builder()
//!     .store_domain("my-store.myshopify.com")
//!     .access_token("shpat_...")
//!     .build()
//!     .unwrap();
//!
//! // Last 30 days, aggregated
//! let report = sdk.report(&DateRangeRequest::range("30d")).unwrap();
//! println!("net sales: {}", report.summary.net_sales);
//!
//! // Dashboard read model
//! let dashboard = sdk.dashboard(&DateRangeRequest::range("ytd")).unwrap();
//! ```

pub mod aggregator;
pub mod analytics;
#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod date_range;
pub mod error;
pub mod export;
pub mod models;
pub mod numeric;
pub mod query;
pub mod source;
pub mod sync_status;

pub use aggregator::{aggregate, aggregate_pages, OrderAggregator};
pub use analytics::{derive_read_model, waterfall_bars};
#[cfg(feature = "async")]
pub use async_client::AsyncSalesSdk;
pub use client::ShopifyClient;
pub use date_range::{resolve_range, DateBounds, DateRangeRequest, TimeRange};
pub use error::{Result, SalesError};
pub use numeric::normalize;
pub use query::OrderQueryBuilder;
pub use source::{JsonFileSource, MemorySource, OrderPage, OrderPages, OrderSource};

use std::cell::RefCell;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use models::{RawOrder, ReadModel, SalesReport, SalesResponse};

// ---------------------------------------------------------------------------
// SalesSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SalesSdk`] instance.
///
/// Use [`SalesSdk::builder()`] (or [`SalesSdkBuilder::from_env()`]) to obtain
/// a builder, chain configuration methods, and call
/// [`build()`](SalesSdkBuilder::build) to create the SDK.
pub struct SalesSdkBuilder {
    store_domain: Option<String>,
    access_token: Option<String>,
    api_version: String,
    page_size: usize,
    timeout: Duration,
    max_pages: Option<usize>,
    offline_file: Option<PathBuf>,
}

impl Default for SalesSdkBuilder {
    fn default() -> Self {
        Self {
            store_domain: None,
            access_token: None,
            api_version: config::DEFAULT_API_VERSION.to_string(),
            page_size: config::DEFAULT_PAGE_SIZE,
            timeout: config::DEFAULT_TIMEOUT,
            max_pages: None,
            offline_file: None,
        }
    }
}

impl SalesSdkBuilder {
    /// Start from `SHOPIFY_STORE_DOMAIN` and `SHOPIFY_ADMIN_API_ACCESS_TOKEN`.
    ///
    /// Missing variables are not an error here; [`build()`](Self::build)
    /// reports them if no offline file is configured either.
    pub fn from_env() -> Self {
        Self {
            store_domain: env::var(config::STORE_DOMAIN_ENV).ok(),
            access_token: env::var(config::ACCESS_TOKEN_ENV).ok(),
            ..Self::default()
        }
    }

    /// Store domain, e.g. `my-store.myshopify.com`.
    pub fn store_domain(mut self, domain: impl Into<String>) -> Self {
        self.store_domain = Some(domain.into());
        self
    }

    /// Admin API access token sent as `X-Shopify-Access-Token`.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Admin API version. Defaults to `2024-01`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Orders per page. Defaults to 50.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// HTTP request timeout per page. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stop paginating after this many pages. Unlimited by default.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Read orders from a JSON export instead of the Admin API.
    ///
    /// When set, no credentials are needed and no network access happens.
    pub fn offline_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.offline_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the SDK.
    ///
    /// Fails with [`SalesError::Config`] when neither an offline file nor
    /// both store domain and access token are configured.
    pub fn build(self) -> Result<SalesSdk> {
        let source: Box<dyn OrderSource + Send> = match self.offline_file {
            Some(path) => Box::new(JsonFileSource::new(path, self.page_size)),
            None => {
                let domain = self.store_domain.ok_or_else(|| {
                    SalesError::Config(format!("{} is not set", config::STORE_DOMAIN_ENV))
                })?;
                let token = self.access_token.ok_or_else(|| {
                    SalesError::Config(format!("{} is not set", config::ACCESS_TOKEN_ENV))
                })?;
                Box::new(ShopifyClient::new(
                    &domain,
                    &token,
                    &self.api_version,
                    self.page_size,
                    self.timeout,
                )?)
            }
        };
        Ok(SalesSdk {
            source: RefCell::new(source),
            max_pages: self.max_pages,
        })
    }
}

// ---------------------------------------------------------------------------
// SalesSdk
// ---------------------------------------------------------------------------

/// The main entry point for the sales analytics SDK.
///
/// Owns one [`OrderSource`] and runs every report as a fresh, independent
/// aggregation over the pages it yields.
pub struct SalesSdk {
    source: RefCell<Box<dyn OrderSource + Send>>,
    max_pages: Option<usize>,
}

impl SalesSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> SalesSdkBuilder {
        SalesSdkBuilder::default()
    }

    /// Wrap an arbitrary order source (e.g. a [`MemorySource`] in tests).
    pub fn from_source<S>(source: S) -> Self
    where
        S: OrderSource + Send + 'static,
    {
        Self {
            source: RefCell::new(Box::new(source)),
            max_pages: None,
        }
    }

    /// Fetch every order inside `bounds`, page by page.
    pub fn fetch_orders(&self, bounds: &DateBounds) -> Result<Vec<RawOrder>> {
        let mut source = self.source.borrow_mut();
        OrderPages::new(&mut **source, bounds.clone())
            .max_pages(self.max_pages)
            .collect_orders()
    }

    /// Aggregate all orders inside `bounds` without materializing them.
    pub fn report_for(&self, bounds: &DateBounds) -> Result<SalesReport> {
        tracing::info!(
            start = bounds.start.as_deref().unwrap_or("-"),
            end = bounds.end.as_deref().unwrap_or("-"),
            "Fetching orders..."
        );
        let mut source = self.source.borrow_mut();
        let pages = OrderPages::new(&mut **source, bounds.clone()).max_pages(self.max_pages);
        let report = aggregate_pages(pages)?;
        tracing::info!(
            orders = report.summary.order_count,
            studios = report.studios.len(),
            "Processed orders"
        );
        Ok(report)
    }

    /// Resolve a window request and aggregate the orders inside it.
    pub fn report(&self, request: &DateRangeRequest) -> Result<SalesReport> {
        self.report_for(&resolve_range(request))
    }

    /// [`report`](Self::report) wrapped in the `{ success, metadata, data }` envelope.
    pub fn response(&self, request: &DateRangeRequest) -> Result<SalesResponse> {
        let report = self.report(request)?;
        Ok(SalesResponse::new(report, Utc::now()))
    }

    /// Derive the dashboard read model for a window request.
    pub fn dashboard(&self, request: &DateRangeRequest) -> Result<ReadModel> {
        let report = self.report(request)?;
        Ok(ReadModel::from_report(&report))
    }

    /// CSV export of the valid studio rows for a window request.
    pub fn export_csv(&self, request: &DateRangeRequest) -> Result<String> {
        let report = self.report(request)?;
        export::studios_csv(&report.studios)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SalesSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_pages {
            Some(max) => write!(f, "SalesSdk(max_pages={})", max),
            None => write!(f, "SalesSdk(max_pages=unlimited)"),
        }
    }
}
