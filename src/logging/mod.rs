//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output with a configurable level
//! - Optional JSON file log with rotation
//! - Helper macros for the recurring per-record events
//!
//! # Example
//!
//! ```no_run
//! use xtractor::logging::init_logging;
//! use xtractor::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a record
///
/// # Example
///
/// ```no_run
/// use xtractor::log_record_start;
///
/// log_record_start!(3, "/blog/my-post");
/// ```
#[macro_export]
macro_rules! log_record_start {
    ($order:expr, $alias_path:expr) => {
        tracing::debug!(order = $order, alias_path = %$alias_path, "Processing record");
    };
}

/// Log a record whose document has been built
///
/// # Example
///
/// ```no_run
/// use xtractor::log_record_complete;
/// use std::path::Path;
///
/// log_record_complete!(3, "my-post", Path::new("out/my-post.xml").display());
/// ```
#[macro_export]
macro_rules! log_record_complete {
    ($order:expr, $slug:expr, $path:expr) => {
        tracing::info!(order = $order, slug = %$slug, path = %$path, "Record exported");
    };
}

/// Log a media download that failed; the reference is still rewritten
///
/// # Example
///
/// ```no_run
/// use xtractor::log_download_failure;
///
/// log_download_failure!("my-post", "https://example.com/a.png", "HTTP 404");
/// ```
#[macro_export]
macro_rules! log_download_failure {
    ($slug:expr, $url:expr, $error:expr) => {
        tracing::warn!(
            slug = %$slug,
            url = %$url,
            error = %$error,
            "Media download failed; reference will point to a missing file"
        );
    };
}
