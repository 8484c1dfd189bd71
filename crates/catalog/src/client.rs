//! HTTP client for the free exercise catalog.
//!
//! Wraps two GET endpoints (the catalog JSON and individual images) using
//! [`reqwest`]. Every request carries its own timeout; a timeout surfaces as
//! [`CatalogError::Request`] like any other transport failure.

use std::time::Duration;

use fitness_core::catalog::CatalogItem;

/// Full catalog as a single JSON array.
pub const CATALOG_URL: &str =
    "https://raw.githubusercontent.com/yuhonas/free-exercise-db/main/dist/exercises.json";

/// Base URL that catalog image paths are relative to.
pub const IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/yuhonas/free-exercise-db/main/exercises/";

/// Timeout for the whole catalog download, body included.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a single image download, body included.
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the catalog HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The source returned a non-2xx status code.
    #[error("HTTP error: status {status}")]
    HttpStatus { status: reqwest::StatusCode },

    /// The catalog body was not a JSON array of catalog entries.
    #[error("Failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client for the catalog source.
pub struct CatalogClient {
    client: reqwest::Client,
    catalog_url: String,
    image_base_url: String,
    catalog_timeout: Duration,
    image_timeout: Duration,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    /// Client pointed at the public catalog.
    pub fn new() -> Self {
        Self::with_endpoints(CATALOG_URL, IMAGE_BASE_URL)
    }

    /// Client pointed at another catalog/image host (mirrors, test stubs).
    pub fn with_endpoints(catalog_url: impl Into<String>, image_base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            catalog_url: catalog_url.into(),
            image_base_url: image_base_url.into(),
            catalog_timeout: CATALOG_TIMEOUT,
            image_timeout: IMAGE_TIMEOUT,
        }
    }

    /// Override the request timeouts.
    pub fn with_timeouts(mut self, catalog: Duration, image: Duration) -> Self {
        self.catalog_timeout = catalog;
        self.image_timeout = image;
        self
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Download and decode the full catalog.
    ///
    /// All or nothing: any transport, status, or decode failure yields an
    /// error and no items.
    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let response = self
            .client
            .get(&self.catalog_url)
            .timeout(self.catalog_timeout)
            .send()
            .await?;
        let response = Self::ensure_success(response)?;

        let body = response.bytes().await?;
        let items: Vec<CatalogItem> = serde_json::from_slice(&body)?;

        tracing::info!(count = items.len(), url = %self.catalog_url, "Fetched exercise catalog");
        Ok(items)
    }

    /// Download one image fully into memory.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let response = self.open_image(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Start an image download and return the response once its status has
    /// been checked, leaving the body for the caller to stream.
    ///
    /// The image timeout keeps running while the body is read.
    pub async fn open_image(&self, url: &str) -> Result<reqwest::Response, CatalogError> {
        let response = self
            .client
            .get(url)
            .timeout(self.image_timeout)
            .send()
            .await?;
        Self::ensure_success(response)
    }

    fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(CatalogError::HttpStatus { status })
        }
    }
}
