//! Generate command implementation
//!
//! This module implements the `generate` command, which writes a starter
//! configuration file.

use crate::cli::exit_code;
use crate::config::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Generating configuration file");

        println!("📝 Generating Xtractor configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(exit_code::CONFIGURATION);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your site and page type", self.output);
                println!("  2. Put the CMS password in .env as XTRACTOR_CMS_PASSWORD");
                println!("  3. Validate configuration: xtractor validate-config");
                println!("  4. Try a dry run: xtractor extract --dry-run");
                println!();
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_code::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Xtractor Configuration File
# CMS content to portable XML export

[cms]
kind = "rest"
base_url = "https://cms.example.com"
username = "Administrator"
# password = "${XTRACTOR_CMS_PASSWORD}"

[query]
page_type = "CMS.BlogPost"
columns = ["BlogPostTitle", "BlogPostSummary", "BlogPostBody", "BlogPostTeaser"]
root_alias_path = "/"

[export]
absolute_site_url = "https://www.example.com/"
output_dir = ".xtractor"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Xtractor Configuration File
# CMS content to portable XML export
#
# Values may reference environment variables as ${NAME}. Every key can also
# be overridden with XTRACTOR_<SECTION>_<KEY>, e.g. XTRACTOR_EXPORT_DRY_RUN.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Content Source
# ============================================================================
[cms]
# "rest" reads the CMS REST service, "file" reads a JSON records file
kind = "rest"

# Root URL of the CMS instance
base_url = "https://cms.example.com"

# User the session runs as
username = "Administrator"

# Password for basic authentication (use an environment variable)
# password = "${XTRACTOR_CMS_PASSWORD}"

# Culture code of the exported documents
culture = "en-us"

# Request timeout in seconds
timeout_seconds = 60

# TLS certificate verification
tls_verify = true

# JSON records file, used when kind = "file"
# records_file = "records.json"

# ============================================================================
# Record Query
# ============================================================================
[query]
# Page type to export
page_type = "CMS.BlogPost"

# Columns to export. The first one is the title and is never written as a
# body field.
columns = ["BlogPostTitle", "BlogPostSummary", "BlogPostBody", "BlogPostTeaser"]

# Only children of this path are exported
root_alias_path = "/"

# Ordering columns, optionally suffixed with ASC or DESC
order_by = ["NodeAliasPath"]

# Maximum number of records
# top_n = 100

# Only published records
published_only = true

# ============================================================================
# Output
# ============================================================================
[export]
# Live site URL; relative links and ~/ paths resolve against it
absolute_site_url = "https://www.example.com/"

# Output root directory
output_dir = ".xtractor"

# Aggregate and redirect document names
all_nodes_filename = "allNodes.xml"
all_redirects_filename = "allRedirects.xml"

# First segment of rewritten media paths: /<media_root>/<page type>/<slug>/<file>
media_root = "media"

# Remove the output directory before exporting (same as --clean)
clean = false

# Build and log records without writing anything (same as --dry-run)
dry_run = false

# Download media even in dry-run mode
download_media_in_dry_run = false

# Per-download timeout in seconds
download_timeout_seconds = 30

# ============================================================================
# Field Classification
# ============================================================================
# Fields are classified by name: "summary" fields get a synthesized summary,
# title/body/content/summary fields are treated as rich text. Override the
# classes of a field here (summary, rich_text).
[fields.overrides]
# BlogPostTeaser = ["rich_text"]

# ============================================================================
# Macro Values
# ============================================================================
# Literal replacements for embedded {% ... %} expressions
[macros]
# "CurrentSite.SiteName" = "Example"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files next to the console output
local_enabled = false
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
