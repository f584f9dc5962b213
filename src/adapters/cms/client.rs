//! CMS client factory

use super::file::FileContentSource;
use super::rest::RestContentSource;
use super::source::{ContentSource, RecordQuery};
use crate::config::{CmsConfig, CmsKind};
use crate::domain::{ContentRecord, Result, XtractorError};
use std::sync::Arc;

/// Connected content source
///
/// Construction selects the source implementation for the configured kind
/// and connects it. A client that exists is a client that connected.
pub struct CmsClient {
    source: Arc<dyn ContentSource>,
}

impl CmsClient {
    /// Creates and connects the source for `config`
    ///
    /// # Errors
    ///
    /// Returns [`XtractorError::Connection`] when the source cannot be reached
    /// or rejects the credentials, and a configuration error when the kind
    /// is missing its settings.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use xtractor::adapters::cms::CmsClient;
    /// use xtractor::config::CmsConfig;
    ///
    /// # async fn example() -> xtractor::domain::Result<()> {
    /// let config = CmsConfig::default();
    /// let client = CmsClient::new(&config).await?;
    /// println!("connected to {}", client.describe());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: &CmsConfig) -> Result<Self> {
        let source: Arc<dyn ContentSource> = match config.kind {
            CmsKind::Rest => {
                let mut source = RestContentSource::new(config.clone())?;
                source.connect().await?;
                Arc::new(source)
            }
            CmsKind::File => {
                let path = config.records_file.clone().ok_or_else(|| {
                    XtractorError::Configuration(
                        "cms.records_file is required when kind is 'file'".to_string(),
                    )
                })?;
                let mut source = FileContentSource::new(path);
                source.connect().await?;
                Arc::new(source)
            }
        };

        tracing::info!(source = %source.describe(), "Content source connected");
        Ok(Self { source })
    }

    /// Wraps an already connected source
    pub fn from_source(source: Arc<dyn ContentSource>) -> Self {
        Self { source }
    }

    /// Fetches records for `query`
    pub async fn fetch_records(&self, query: &RecordQuery) -> Result<Vec<ContentRecord>> {
        self.source.fetch_records(query).await
    }

    /// Location of the connected source
    pub fn describe(&self) -> String {
        self.source.describe()
    }
}
