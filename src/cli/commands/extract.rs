//! Extract command implementation
//!
//! This module implements the `extract` command: connect to the content
//! source, run the export pipeline and report the outcome.

use crate::cli::exit_code;
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportOptions, ExportSummary};
use crate::domain::XtractorError;
use clap::Args;
use std::path::Path;

/// Arguments for the extract command
#[derive(Args, Debug, Default)]
pub struct ExtractArgs {
    /// Remove the output directory before exporting
    #[arg(long)]
    pub clean: bool,

    /// Build and log records without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(&self, config_path: &Path) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path.display(), "Starting extract command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration could not be loaded");
                eprintln!("Configuration error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        let options = ExportOptions {
            clean: self.clean,
            dry_run: self.dry_run,
        };
        if options.dry_run || config.export.dry_run {
            tracing::info!("Dry run mode enabled - nothing will be written");
            println!("🔍 DRY RUN MODE - nothing will be written");
            println!();
        }

        let source = config.cms.kind;
        let mut coordinator = match ExportCoordinator::new(config, options).await {
            Ok(c) => c,
            Err(e) => return Ok(report_startup_failure(&e, &source.to_string())),
        };

        println!("🚀 Starting extraction...");
        let summary = match coordinator.execute_export().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed");
                eprintln!("Extraction failed: {e}");
                return Ok(e.exit_code());
            }
        };

        print_summary(&summary);
        Ok(outcome_code(&summary))
    }
}

fn report_startup_failure(error: &XtractorError, source: &str) -> i32 {
    tracing::error!(error = %error, "Failed to start extraction");
    match error {
        XtractorError::Connection(_) => {
            eprintln!("Could not connect to the {source} content source: {error}");
            eprintln!("Please check the connection parameters in the [cms] section.");
        }
        _ => eprintln!("Failed to initialize extraction: {error}"),
    }
    error.exit_code()
}

fn outcome_code(summary: &ExportSummary) -> i32 {
    if summary.is_clean() {
        exit_code::SUCCESS
    } else {
        exit_code::WARNINGS
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Extraction Summary:");
    println!("  Records processed: {}", summary.records_processed);
    println!("  Records written: {}", summary.records_written);
    if summary.records_skipped > 0 {
        println!("  Records skipped: {}", summary.records_skipped);
    }
    println!(
        "  Media saved / failed / skipped: {} / {} / {}",
        summary.media_saved, summary.media_failed, summary.media_skipped
    );
    println!("  Widget fields: {}", summary.widgets_detected);
    println!("  Warnings: {}", summary.warnings.len());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.warnings.is_empty() {
        println!("⚠️  Warnings:");
        for warning in summary.warnings.iter().take(10) {
            println!("  - {}: {}", warning.kind, warning.message);
            if let Some(context) = &warning.context {
                println!("    Context: {context}");
            }
        }
        if summary.warnings.len() > 10 {
            println!("  ... and {} more warnings", summary.warnings.len() - 10);
        }
        println!();
    }

    if summary.dry_run {
        println!("✅ Dry run succeeded");
    } else {
        println!(
            "✅ Extraction to {} succeeded",
            summary.output_dir.display()
        );
    }
}
