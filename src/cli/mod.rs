//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Xtractor using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Exit codes returned by every command
pub mod exit_code {
    /// Completed without warnings
    pub const SUCCESS: i32 = 0;
    /// Completed with per-field warnings
    pub const WARNINGS: i32 = 1;
    /// Configuration missing or invalid
    pub const CONFIGURATION: i32 = 2;
    /// Content source unreachable or credentials rejected
    pub const CONNECTION: i32 = 4;
    /// Anything else, including output write failures
    pub const FATAL: i32 = 5;
}

/// Xtractor - CMS content to portable XML export tool
#[derive(Parser, Debug)]
#[command(name = "xtractor")]
#[command(version, about, long_about = None)]
#[command(author = "Xtractor Contributors")]
pub struct Cli {
    /// Path to configuration file [default: xtractor.toml]
    #[arg(short, long, env = "XTRACTOR_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "XTRACTOR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export content records to the output tree
    Extract(commands::extract::ExtractArgs),

    /// Generate a starter configuration file
    Generate(commands::generate::GenerateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
