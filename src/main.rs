// Xtractor - CMS content to portable XML export tool
// Copyright (c) 2025 Xtractor Contributors
// Licensed under the MIT License

use clap::Parser;
use std::path::Path;
use std::process;
use xtractor::cli::{exit_code, Cli, Commands};
use xtractor::config::{load_config, resolve_config_path};
use xtractor::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report config errors themselves
    let config_path = resolve_config_path(cli.config.as_deref());
    let (config_level, logging_config) = match load_config(&config_path) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, Default::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_code::FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Xtractor - CMS content to portable XML export tool"
    );

    let exit_code = match execute_command(&cli, &config_path).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_code::FATAL
        }
    };

    // process::exit skips destructors; flush the log writer first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config_path: &Path) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Extract(args) => args.execute(config_path).await,
        Commands::Generate(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
    }
}
