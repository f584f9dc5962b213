//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CmsKind, XtractorConfig};
use crate::config::secret_string;
use crate::domain::errors::XtractorError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file used when neither `--config` nor `XTRACTOR_CONFIG` is given
pub const DEFAULT_CONFIG_PATH: &str = "xtractor.toml";

/// Loads configuration from a TOML file
///
/// Steps, in order:
/// 1. Read the file
/// 2. Substitute `${VAR}` placeholders outside comment lines
/// 3. Parse the TOML into [`XtractorConfig`]
/// 4. Apply `XTRACTOR_<SECTION>_<KEY>` environment overrides
/// 5. Validate
///
/// # Errors
///
/// Returns [`XtractorError::Configuration`] for a missing or unreadable
/// file, unset placeholder variables, a parse failure or a failed validation.
///
/// # Examples
///
/// ```no_run
/// use xtractor::config::loader::load_config;
///
/// let config = load_config("xtractor.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<XtractorConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(XtractorError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        XtractorError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: XtractorConfig = toml::from_str(&contents)
        .map_err(|e| XtractorError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        XtractorError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Resolves the configuration path from the CLI flag, then `XTRACTOR_CONFIG`
pub fn resolve_config_path(cli_path: Option<&str>) -> PathBuf {
    cli_path
        .map(PathBuf::from)
        .or_else(|| std::env::var("XTRACTOR_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Every missing variable is reported at once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| XtractorError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(XtractorError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_flag(name: &str, default: bool) -> Option<bool> {
    std::env::var(name).ok().map(|val| val.parse().unwrap_or(default))
}

/// Applies environment variable overrides using the `XTRACTOR_` prefix
///
/// Variables follow the pattern `XTRACTOR_<SECTION>_<KEY>`, for example
/// `XTRACTOR_CMS_BASE_URL` or `XTRACTOR_EXPORT_OUTPUT_DIR`.
fn apply_env_overrides(config: &mut XtractorConfig) {
    // Application
    if let Ok(val) = std::env::var("XTRACTOR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // CMS
    if let Ok(val) = std::env::var("XTRACTOR_CMS_KIND") {
        match val.to_lowercase().as_str() {
            "rest" => config.cms.kind = CmsKind::Rest,
            "file" => config.cms.kind = CmsKind::File,
            other => tracing::warn!(value = other, "Ignoring unknown XTRACTOR_CMS_KIND"),
        }
    }
    if let Ok(val) = std::env::var("XTRACTOR_CMS_BASE_URL") {
        config.cms.base_url = val;
    }
    if let Ok(val) = std::env::var("XTRACTOR_CMS_USERNAME") {
        config.cms.username = val;
    }
    if let Ok(val) = std::env::var("XTRACTOR_CMS_PASSWORD") {
        config.cms.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("XTRACTOR_CMS_CULTURE") {
        config.cms.culture = val;
    }
    if let Some(flag) = env_flag("XTRACTOR_CMS_TLS_VERIFY", true) {
        config.cms.tls_verify = flag;
    }
    if let Ok(val) = std::env::var("XTRACTOR_CMS_RECORDS_FILE") {
        config.cms.records_file = Some(PathBuf::from(val));
    }

    // Query
    if let Ok(val) = std::env::var("XTRACTOR_QUERY_PAGE_TYPE") {
        config.query.page_type = val;
    }
    if let Ok(val) = std::env::var("XTRACTOR_QUERY_ROOT_ALIAS_PATH") {
        config.query.root_alias_path = val;
    }
    if let Ok(val) = std::env::var("XTRACTOR_QUERY_TOP_N") {
        if let Ok(top_n) = val.parse() {
            config.query.top_n = Some(top_n);
        }
    }

    // Export
    if let Ok(val) = std::env::var("XTRACTOR_EXPORT_ABSOLUTE_SITE_URL") {
        config.export.absolute_site_url = val;
    }
    if let Ok(val) = std::env::var("XTRACTOR_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("XTRACTOR_EXPORT_MEDIA_ROOT") {
        config.export.media_root = val;
    }
    if let Some(flag) = env_flag("XTRACTOR_EXPORT_CLEAN", false) {
        config.export.clean = flag;
    }
    if let Some(flag) = env_flag("XTRACTOR_EXPORT_DRY_RUN", false) {
        config.export.dry_run = flag;
    }

    // Logging
    if let Some(flag) = env_flag("XTRACTOR_LOGGING_LOCAL_ENABLED", false) {
        config.logging.local_enabled = flag;
    }
    if let Ok(val) = std::env::var("XTRACTOR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
