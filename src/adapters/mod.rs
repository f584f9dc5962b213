//! External system integrations for Xtractor.
//!
//! - [`cms`] - Content sources (CMS REST service, JSON records file)
//! - [`macros`] - Resolution of embedded macro expressions
//! - [`media`] - Media downloads
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits
//! ([`cms::ContentSource`], [`macros::MacroResolver`], [`media::MediaFetcher`])
//! so the pipeline can be tested with in-memory implementations.
//!
//! ```rust,no_run
//! use xtractor::adapters::cms::CmsClient;
//! use xtractor::config::{secret_string, CmsConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CmsConfig {
//!     base_url: "https://cms.example.com".to_string(),
//!     username: "Administrator".to_string(),
//!     password: Some(secret_string("pass".to_string())),
//!     ..CmsConfig::default()
//! };
//!
//! let client = CmsClient::new(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod cms;
pub mod macros;
pub mod media;
