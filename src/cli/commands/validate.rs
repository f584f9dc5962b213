//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Xtractor configuration file.

use crate::cli::exit_code;
use crate::config::{load_config, CmsKind, XtractorConfig};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &Path) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path.display(), "Validating configuration");

        println!(
            "🔍 Validating configuration file: {}",
            config_path.display()
        );
        println!();

        // Loading validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_code::CONFIGURATION);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print_summary(&config);
        Ok(exit_code::SUCCESS)
    }
}

fn print_summary(config: &XtractorConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    match config.cms.kind {
        CmsKind::Rest => {
            println!("  Content Source: {} (REST)", config.cms.base_url);
            println!("  User: {}", config.cms.username);
            println!(
                "  Password: {}",
                if config.cms.password.is_some() {
                    "set"
                } else {
                    "not set"
                }
            );
        }
        CmsKind::File => {
            let path = config
                .cms
                .records_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("  Content Source: {path} (file)");
        }
    }
    println!("  Page Type: {}", config.query.page_type);
    println!("  Columns: {:?}", config.query.columns);
    println!("  Root Alias Path: {}", config.query.root_alias_path);
    println!("  Order By: {:?}", config.query.order_by);
    if let Some(top_n) = config.query.top_n {
        println!("  Top N: {top_n}");
    }
    println!("  Site URL: {}", config.export.absolute_site_url);
    println!("  Output Directory: {}", config.export.output_dir.display());
    println!("  Field Overrides: {}", config.fields.overrides.len());
    println!("  Macro Values: {}", config.macros.len());
    println!();
}
