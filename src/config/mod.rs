//! Configuration management for Xtractor.
//!
//! Xtractor reads a TOML file (default `xtractor.toml`) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `XTRACTOR_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [cms]
//! kind = "rest"
//! base_url = "https://cms.example.com"
//! username = "Administrator"
//! password = "${XTRACTOR_CMS_PASSWORD}"
//!
//! [query]
//! page_type = "CMS.BlogPost"
//! columns = ["BlogPostTitle", "BlogPostSummary", "BlogPostBody", "BlogPostTeaser"]
//! root_alias_path = "/blog"
//! order_by = ["BlogPostDate ASC"]
//!
//! [export]
//! absolute_site_url = "https://www.example.com/"
//! output_dir = ".xtractor"
//!
//! [macros]
//! "CurrentSite.SiteName" = "Example"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, resolve_config_path, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, CmsConfig, CmsKind, ExportConfig, FieldsConfig, LoggingConfig,
    QueryConfig, XtractorConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
