//! Configuration schema types
//!
//! Maps one-to-one onto the sections of `xtractor.toml`.

use crate::config::SecretString;
use crate::domain::fields::is_xml_name;
use crate::domain::{FieldAllowList, FieldClass, PageType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use url::Url;

/// Main Xtractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XtractorConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Content source connection
    pub cms: CmsConfig,

    /// Which records to fetch
    pub query: QueryConfig,

    /// Output settings
    pub export: ExportConfig,

    /// Per-field classification overrides
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Literal values for embedded macro expressions
    #[serde(default)]
    pub macros: BTreeMap<String, String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl XtractorConfig {
    /// Loads, substitutes, overrides and validates a configuration file
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::XtractorError::Configuration`] when the file is
    /// missing, unparsable or invalid.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::domain::Result<Self> {
        crate::config::loader::load_config(path)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.cms.validate()?;
        self.query.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Kind of content source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CmsKind {
    /// CMS REST service
    #[default]
    Rest,
    /// JSON export file on disk
    File,
}

impl std::fmt::Display for CmsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CmsKind::Rest => f.write_str("rest"),
            CmsKind::File => f.write_str("file"),
        }
    }
}

/// Content source connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Source kind
    #[serde(default)]
    pub kind: CmsKind,

    /// Root URL of the CMS instance (REST kind)
    #[serde(default)]
    pub base_url: String,

    /// User the session runs as
    #[serde(default = "default_username")]
    pub username: String,

    /// Password for basic authentication
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Culture code used in REST paths
    #[serde(default = "default_culture")]
    pub culture: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// JSON records file (file kind)
    #[serde(default)]
    pub records_file: Option<PathBuf>,
}

impl CmsConfig {
    fn validate(&self) -> Result<(), String> {
        match self.kind {
            CmsKind::Rest => {
                if self.base_url.is_empty() {
                    return Err("cms.base_url cannot be empty when kind is 'rest'".to_string());
                }
                if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://")
                {
                    return Err("cms.base_url must start with http:// or https://".to_string());
                }
                if self.username.trim().is_empty() {
                    return Err("cms.username cannot be empty when kind is 'rest'".to_string());
                }
            }
            CmsKind::File => {
                if self.records_file.is_none() {
                    return Err("cms.records_file is required when kind is 'file'".to_string());
                }
            }
        }

        if self.timeout_seconds == 0 {
            return Err("cms.timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            kind: CmsKind::default(),
            base_url: String::new(),
            username: default_username(),
            password: None,
            culture: default_culture(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            records_file: None,
        }
    }
}

/// Record query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Page type to export, e.g. `CMS.BlogPost`
    pub page_type: String,

    /// Columns to fetch; the first one is the title/identity column
    pub columns: Vec<String>,

    /// Only children of this path are exported
    #[serde(default = "default_root_alias_path")]
    pub root_alias_path: String,

    /// Ordering columns, each optionally suffixed with ASC or DESC
    #[serde(default = "default_order_by")]
    pub order_by: Vec<String>,

    /// Maximum number of records (unlimited when absent)
    #[serde(default)]
    pub top_n: Option<usize>,

    /// Only published records
    #[serde(default = "default_true")]
    pub published_only: bool,
}

impl QueryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.page_type.trim().is_empty() {
            return Err("query.page_type cannot be blank".to_string());
        }
        if self.columns.is_empty() {
            return Err("query.columns cannot be empty".to_string());
        }
        if self.columns.iter().any(|c| c.trim().is_empty()) {
            return Err("query.columns cannot contain blank names".to_string());
        }
        if let Some(bad) = self.columns.iter().skip(1).find(|c| !is_xml_name(c)) {
            return Err(format!(
                "query.columns entry '{bad}' is not a valid XML element name"
            ));
        }
        if self.top_n == Some(0) {
            return Err("query.top_n must be >= 1".to_string());
        }
        if !self.root_alias_path.starts_with('/') {
            return Err("query.root_alias_path must start with '/'".to_string());
        }
        Ok(())
    }

    /// Typed page type
    pub fn page_type(&self) -> Result<PageType, String> {
        PageType::new(self.page_type.clone())
    }

    /// Field allow-list built from the configured columns
    pub fn allow_list(&self) -> Result<FieldAllowList, String> {
        FieldAllowList::new(self.columns.clone())
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Absolute URL of the live site; relative links resolve against it
    pub absolute_site_url: String,

    /// Output root directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Aggregate document file name
    #[serde(default = "default_all_nodes_filename")]
    pub all_nodes_filename: String,

    /// Redirect document file name
    #[serde(default = "default_all_redirects_filename")]
    pub all_redirects_filename: String,

    /// First segment of rewritten media paths
    #[serde(default = "default_media_root")]
    pub media_root: String,

    /// Remove the output root before exporting
    #[serde(default)]
    pub clean: bool,

    /// Build and log records without writing anything
    #[serde(default)]
    pub dry_run: bool,

    /// Download media even in dry-run mode
    #[serde(default)]
    pub download_media_in_dry_run: bool,

    /// Per-download timeout in seconds
    #[serde(default = "default_download_timeout_seconds")]
    pub download_timeout_seconds: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        self.site_url()?;

        if self.all_nodes_filename.trim().is_empty() {
            return Err("export.all_nodes_filename cannot be blank".to_string());
        }
        if self.all_redirects_filename.trim().is_empty() {
            return Err("export.all_redirects_filename cannot be blank".to_string());
        }
        if self.all_nodes_filename == self.all_redirects_filename {
            return Err(
                "export.all_nodes_filename and export.all_redirects_filename must differ"
                    .to_string(),
            );
        }
        if self.media_root.trim_matches('/').is_empty() {
            return Err("export.media_root cannot be blank".to_string());
        }
        if self.download_timeout_seconds == 0 {
            return Err("export.download_timeout_seconds must be > 0".to_string());
        }
        Ok(())
    }

    /// Parsed site URL, always ending in `/` so relative joins keep its path
    pub fn site_url(&self) -> Result<Url, String> {
        let mut raw = self.absolute_site_url.trim().to_string();
        if raw.is_empty() {
            return Err("export.absolute_site_url cannot be blank".to_string());
        }
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|e| format!("export.absolute_site_url '{raw}' is not a valid URL: {e}"))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err("export.absolute_site_url must start with http:// or https://".to_string());
        }
        Ok(url)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            absolute_site_url: String::new(),
            output_dir: default_output_dir(),
            all_nodes_filename: default_all_nodes_filename(),
            all_redirects_filename: default_all_redirects_filename(),
            media_root: default_media_root(),
            clean: false,
            dry_run: false,
            download_media_in_dry_run: false,
            download_timeout_seconds: default_download_timeout_seconds(),
        }
    }
}

/// Field classification overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Field name -> classes applied instead of the name-derived ones
    #[serde(default)]
    pub overrides: BTreeMap<String, Vec<FieldClass>>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable the JSON file log
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_username() -> String {
    "Administrator".to_string()
}

fn default_culture() -> String {
    "en-us".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_root_alias_path() -> String {
    "/".to_string()
}

fn default_order_by() -> Vec<String> {
    vec!["NodeAliasPath".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".xtractor")
}

fn default_all_nodes_filename() -> String {
    "allNodes.xml".to_string()
}

fn default_all_redirects_filename() -> String {
    "allRedirects.xml".to_string()
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_download_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
