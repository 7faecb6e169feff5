//! Async wrapper around [`SalesSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free while
//! the blocking HTTP client pages through orders.
//!
//! # Example
//!
//! ```no_run
//! use shopify_sales_sdk::{AsyncSalesSdk, DateRangeRequest};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = AsyncSalesSdk::builder().from_env().build().await.unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let csv = sdk.run(|s| s.export_csv(&DateRangeRequest::range("90d"))).await.unwrap();
//!
//!     // Convenience method for the response envelope
//!     let response = sdk.response(DateRangeRequest::range("30d")).await.unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::date_range::DateRangeRequest;
use crate::error::{Result, SalesError};
use crate::models::{ReadModel, SalesReport, SalesResponse};
use crate::{SalesSdk, SalesSdkBuilder};

// ---------------------------------------------------------------------------
// AsyncSalesSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSalesSdk`] instance.
///
/// Mirrors [`SalesSdkBuilder`]; construction itself runs on the blocking pool.
#[derive(Default)]
pub struct AsyncSalesSdkBuilder {
    inner: SalesSdkBuilder,
}

impl AsyncSalesSdkBuilder {
    /// Replace the configuration with one read from the environment.
    pub fn from_env(mut self) -> Self {
        self.inner = SalesSdkBuilder::from_env();
        self
    }

    pub fn store_domain(mut self, domain: impl Into<String>) -> Self {
        self.inner = self.inner.store_domain(domain);
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.inner = self.inner.access_token(token);
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.inner = self.inner.api_version(version);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.inner = self.inner.page_size(page_size);
        self
    }

    /// Set the HTTP request timeout per page.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.inner = self.inner.max_pages(max_pages);
        self
    }

    /// Read orders from a JSON export instead of the Admin API.
    pub fn offline_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        self.inner = self.inner.offline_file(path);
        self
    }

    /// Build the async SDK.
    ///
    /// The blocking HTTP client is created on the blocking thread pool so
    /// it won't block the async event loop.
    pub async fn build(self) -> Result<AsyncSalesSdk> {
        let builder = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = builder.build()?;
            Ok(AsyncSalesSdk::from_sdk(sdk))
        })
        .await
        .map_err(|e| SalesError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSalesSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`SalesSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. The underlying [`SalesSdk`] is
/// protected by a [`Mutex`] since it uses `RefCell` internally, so
/// concurrent requests are served one after another.
#[derive(Clone)]
pub struct AsyncSalesSdk {
    inner: Arc<Mutex<SalesSdk>>,
}

impl AsyncSalesSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncSalesSdkBuilder {
        AsyncSalesSdkBuilder::default()
    }

    /// Wrap an already-built sync SDK.
    pub fn from_sdk(sdk: SalesSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&SalesSdk` reference and should return
    /// a `Result<T>`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use shopify_sales_sdk::{AsyncSalesSdk, DateRangeRequest};
    /// # async fn example() -> shopify_sales_sdk::Result<()> {
    /// # let sdk = AsyncSalesSdk::builder().from_env().build().await?;
    /// let report = sdk.run(|s| s.report(&DateRangeRequest::range("ytd"))).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SalesSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = sdk
                .lock()
                .map_err(|_| SalesError::InvalidArgument("SDK lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| SalesError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Aggregated report for a window request.
    pub async fn report(&self, request: DateRangeRequest) -> Result<SalesReport> {
        self.run(move |s| s.report(&request)).await
    }

    /// Report wrapped in the response envelope.
    pub async fn response(&self, request: DateRangeRequest) -> Result<SalesResponse> {
        self.run(move |s| s.response(&request)).await
    }

    /// Dashboard read model for a window request.
    pub async fn dashboard(&self, request: DateRangeRequest) -> Result<ReadModel> {
        self.run(move |s| s.dashboard(&request)).await
    }

    /// Studio CSV for a window request.
    pub async fn export_csv(&self, request: DateRangeRequest) -> Result<String> {
        self.run(move |s| s.export_csv(&request)).await
    }
}
