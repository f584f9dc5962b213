//! Media download collaborators
//!
//! The transformer hands every image or bare media reference to a
//! [`MediaFetcher`]. Failures are reported as a [`FetchOutcome`], never as an
//! error: a failed download must not stop the export.

use crate::config::ExportConfig;
use crate::domain::{Result, XtractorError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Result of one download attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// File written with this many bytes
    Saved(u64),
    /// Download intentionally not attempted
    Skipped,
    /// Download or write failed
    Failed(String),
}

/// Downloads a media reference into a destination file
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetches `url` and stores it at `destination`, creating parent directories
    async fn fetch(&self, url: &Url, destination: &Path) -> FetchOutcome;
}

/// Fetcher backed by an HTTP client
///
/// Non-2xx responses count as failures. No retries.
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    /// Creates a fetcher whose requests time out after `timeout`
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("xtractor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| XtractorError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    async fn download(&self, url: &Url, destination: &Path) -> std::result::Result<u64, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let bytes = response.bytes().await.map_err(|e| e.to_string())?;

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("create {}: {e}", parent.display()))?;
        }
        tokio::fs::write(destination, &bytes)
            .await
            .map_err(|e| format!("write {}: {e}", destination.display()))?;

        Ok(bytes.len() as u64)
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &Url, destination: &Path) -> FetchOutcome {
        tracing::debug!(url = %url, destination = %destination.display(), "Downloading media");
        match self.download(url, destination).await {
            Ok(bytes) => FetchOutcome::Saved(bytes),
            Err(message) => FetchOutcome::Failed(message),
        }
    }
}

/// Fetcher that never downloads; used for dry runs
#[derive(Debug, Default, Clone, Copy)]
pub struct SkippingFetcher;

#[async_trait]
impl MediaFetcher for SkippingFetcher {
    async fn fetch(&self, url: &Url, destination: &Path) -> FetchOutcome {
        tracing::debug!(
            url = %url,
            destination = %destination.display(),
            "Dry run: media download skipped"
        );
        FetchOutcome::Skipped
    }
}

/// Picks the fetcher for a run
///
/// Dry runs skip downloads unless `download_media_in_dry_run` is set.
pub fn fetcher_for(export: &ExportConfig, dry_run: bool) -> Result<Arc<dyn MediaFetcher>> {
    if dry_run && !export.download_media_in_dry_run {
        return Ok(Arc::new(SkippingFetcher));
    }
    Ok(Arc::new(HttpMediaFetcher::new(Duration::from_secs(
        export.download_timeout_seconds,
    ))?))
}
