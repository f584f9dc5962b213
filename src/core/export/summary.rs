//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Records consumed from the source
    pub records_processed: usize,

    /// Per-record documents written
    pub records_written: usize,

    /// Records skipped because no slug could be derived
    pub records_skipped: usize,

    /// Media files downloaded
    pub media_saved: usize,

    /// Media downloads that failed
    pub media_failed: usize,

    /// Media downloads not attempted
    pub media_skipped: usize,

    /// Fields containing inline widget markup
    pub widgets_detected: usize,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Page-type directory of the run
    pub output_dir: PathBuf,

    /// Aggregate document path (not written in dry runs)
    pub all_nodes_path: PathBuf,

    /// Redirect document path (not written in dry runs)
    pub all_redirects_path: PathBuf,

    /// Start of the run
    pub started_at: DateTime<Utc>,

    /// Duration of the run
    pub duration: Duration,

    /// Recoverable problems encountered
    pub warnings: Vec<ExportWarning>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            records_processed: 0,
            records_written: 0,
            records_skipped: 0,
            media_saved: 0,
            media_failed: 0,
            media_skipped: 0,
            widgets_detected: 0,
            dry_run,
            output_dir: PathBuf::new(),
            all_nodes_path: PathBuf::new(),
            all_redirects_path: PathBuf::new(),
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            warnings: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ExportWarning) {
        self.warnings.push(warning);
    }

    /// Whether the run finished without any warning
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            records_processed = self.records_processed,
            records_written = self.records_written,
            records_skipped = self.records_skipped,
            media_saved = self.media_saved,
            media_failed = self.media_failed,
            media_skipped = self.media_skipped,
            widgets = self.widgets_detected,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        if !self.warnings.is_empty() {
            tracing::warn!(
                warning_count = self.warnings.len(),
                "Export completed with warnings"
            );
            for warning in &self.warnings {
                tracing::warn!(
                    kind = %warning.kind,
                    message = %warning.message,
                    context = warning.context.as_deref().unwrap_or(""),
                    "Export warning"
                );
            }
        }
    }
}

/// Kind of recoverable problem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Summary extraction failed
    Summary,
    /// Markup could not be read or rewritten
    Markup,
    /// Inline widget markup left in content
    Widget,
    /// Media download failed
    Download,
    /// Record could not be exported
    Record,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WarningKind::Summary => "summary",
            WarningKind::Markup => "markup",
            WarningKind::Widget => "widget",
            WarningKind::Download => "download",
            WarningKind::Record => "record",
        };
        f.write_str(name)
    }
}

/// Recoverable problem with context
#[derive(Debug, Clone)]
pub struct ExportWarning {
    /// Kind of warning
    pub kind: WarningKind,

    /// Warning message
    pub message: String,

    /// Optional context (e.g., slug, field, URL)
    pub context: Option<String>,
}

impl ExportWarning {
    /// Create a new export warning
    pub fn new(kind: WarningKind, message: String) -> Self {
        Self {
            kind,
            message,
            context: None,
        }
    }

    /// Add context to the warning
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(true);

        assert_eq!(summary.records_processed, 0);
        assert_eq!(summary.records_written, 0);
        assert!(summary.dry_run);
        assert!(summary.is_clean());
        assert_eq!(summary.duration, Duration::from_secs(0));
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new(false).with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_export_warning_with_context() {
        let warning = ExportWarning::new(WarningKind::Download, "HTTP 404".to_string())
            .with_context("slug=my-post".to_string());

        assert_eq!(warning.kind, WarningKind::Download);
        assert_eq!(warning.context.as_deref(), Some("slug=my-post"));
        assert_eq!(warning.kind.to_string(), "download");
    }

    #[test]
    fn test_add_warning_marks_summary_unclean() {
        let mut summary = ExportSummary::new(false);
        summary.add_warning(ExportWarning::new(WarningKind::Widget, "widget".to_string()));

        assert!(!summary.is_clean());
        assert_eq!(summary.warnings.len(), 1);
    }
}
