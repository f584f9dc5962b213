// Xtractor - CMS content to portable XML export tool
// Copyright (c) 2025 Xtractor Contributors
// Licensed under the MIT License

//! # Xtractor - CMS content to portable XML
//!
//! Xtractor pulls the published pages of one page type out of a content
//! management system and writes them as self-contained XML files that a
//! static site generator or another CMS can import.
//!
//! ## Overview
//!
//! For every record the export:
//! - derives a slug from the record's alias path
//! - rewrites rich text fields (macro resolution, absolute links, widget
//!   detection) and wraps them in CDATA
//! - downloads embedded images next to the record and points `src` at them
//! - synthesizes a plain text summary from summary fields
//! - writes `<output>/<pageType>/<slug>/<slug>.xml`
//!
//! After the last record it writes an aggregate document with every record
//! body and an `allRedirects.xml` mapping old alias paths to new slugs.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline and field transformation
//! - [`adapters`] - Content sources, media downloads and macro resolution
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xtractor::config::XtractorConfig;
//! use xtractor::core::export::{ExportCoordinator, ExportOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = XtractorConfig::from_file("xtractor.toml")?;
//!
//!     let mut coordinator = ExportCoordinator::new(config, ExportOptions::default()).await?;
//!     let summary = coordinator.execute_export().await?;
//!
//!     println!("Exported {} records", summary.records_written);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

pub use config::XtractorConfig;
pub use domain::{Result, XtractorError};
